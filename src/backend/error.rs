use thiserror::Error;

/// Errors from the managed backend service client
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// True when the service itself could not be reached (connect,
    /// timeout, DNS). Drives the route guard's fail-open behavior.
    pub fn is_unreachable(&self) -> bool {
        match self {
            BackendError::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Raw status code when the backend answered with an error
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw backend message, used for the substring mapping the auth
    /// flows perform
    pub fn backend_message(&self) -> &str {
        match self {
            BackendError::Status { message, .. } => message,
            _ => "",
        }
    }
}
