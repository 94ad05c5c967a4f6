pub mod auth;
pub mod error;
pub mod query;
pub mod storage;

use std::sync::OnceLock;
use std::time::Duration;

use crate::config;
use auth::AuthApi;
use error::BackendError;
use query::Table;
use storage::StorageBucket;

/// Client for the managed backend service. One shared instance wraps the
/// three surfaces the application consumes: the auth API, the relational
/// query interface, and blob storage. Every call is a single HTTP
/// request; the service is an external collaborator and is never
/// reimplemented here.
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl Backend {
    /// Shared client built from configuration
    pub fn shared() -> &'static Backend {
        static INSTANCE: OnceLock<Backend> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let cfg = &config::config().backend;
            Backend::new(&cfg.url, &cfg.anon_key, cfg.request_timeout_secs)
        })
    }

    pub fn new(base_url: &str, anon_key: &str, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| panic!("failed to build backend HTTP client: {}", e));

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Auth surface (sign up, sign in, OTP, recovery, session lookup)
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Relational query surface for one table or view
    pub fn table(&self, name: impl Into<String>) -> Table<'_> {
        Table::new(self, name)
    }

    /// Server-side function call (search and other backend functions)
    pub fn rpc(&self, function: impl Into<String>) -> Table<'_> {
        Table::rpc(self, function)
    }

    /// Blob storage surface for one bucket
    pub fn storage(&self, bucket: impl Into<String>) -> StorageBucket<'_> {
        StorageBucket::new(self, bucket)
    }

    /// Pings the auth health endpoint to confirm the service is reachable
    pub async fn health_check(&self) -> Result<(), BackendError> {
        let url = format!("{}/auth/v1/health", self.base_url);
        let response = self.http.get(&url).header("apikey", &self.anon_key).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Turn non-2xx responses into `BackendError::Status`, pulling the
    /// service's message out of the body when it has one
    pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                ["msg", "message", "error_description", "error"]
                    .into_iter()
                    .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or(body);

        Err(BackendError::Status { status: status.as_u16(), message })
    }
}
