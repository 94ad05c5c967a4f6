use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::backend::auth::AuthSession;
use crate::backend::Backend;
use crate::config;
use crate::error::ApiError;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// The signed-in caller, resolved from the session cookies. Handlers
/// only ever see the user's id and the access token they forward to the
/// backend; the tokens themselves stay opaque.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub access_token: String,
}

/// Outcome of resolving the cookie pair against the auth service
pub enum SessionState {
    /// No usable session cookies, or the backend rejected them
    Anonymous,
    Authenticated(CurrentUser),
    /// The backend could not be reached; presence is undecidable
    Unknown,
}

pub struct ResolvedSession {
    pub state: SessionState,
    /// Fresh token pair to re-issue as cookies when the access token was
    /// stale and the refresh token still worked
    pub refreshed: Option<AuthSession>,
}

/// Resolve the current session from cookies, refreshing an expired
/// access token with the refresh token when possible
pub async fn resolve_session(backend: &Backend, jar: &CookieJar) -> ResolvedSession {
    let access_token = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());
    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());

    if let Some(token) = access_token {
        match backend.auth().get_user(&token).await {
            Ok(user) => {
                return ResolvedSession {
                    state: SessionState::Authenticated(CurrentUser { id: user.id, access_token: token }),
                    refreshed: None,
                };
            }
            Err(e) if e.is_unreachable() => {
                return ResolvedSession { state: SessionState::Unknown, refreshed: None };
            }
            Err(_) => {
                // Stale or revoked access token; fall through to refresh
            }
        }
    }

    if let Some(token) = refresh_token {
        match backend.auth().refresh_session(&token).await {
            Ok(session) => {
                let user = CurrentUser {
                    id: session.user.id,
                    access_token: session.access_token.clone(),
                };
                return ResolvedSession {
                    state: SessionState::Authenticated(user),
                    refreshed: Some(session),
                };
            }
            Err(e) if e.is_unreachable() => {
                return ResolvedSession { state: SessionState::Unknown, refreshed: None };
            }
            Err(_) => {}
        }
    }

    ResolvedSession { state: SessionState::Anonymous, refreshed: None }
}

/// Build the cookie pair for a session. HttpOnly, Lax, site-wide;
/// Secure per configuration.
pub fn session_cookies(session: &AuthSession) -> [Cookie<'static>; 2] {
    [
        build_cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone()),
        build_cookie(REFRESH_TOKEN_COOKIE, session.refresh_token.clone()),
    ]
}

fn build_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config::config().security.cookie_secure)
        .build()
}

/// Resolve the caller for an API handler; 401 without a session, 503
/// when the backend cannot answer
pub async fn require_user(jar: &CookieJar) -> Result<CurrentUser, ApiError> {
    match resolve_session(Backend::shared(), jar).await.state {
        SessionState::Authenticated(user) => Ok(user),
        SessionState::Anonymous => Err(ApiError::unauthorized("Unauthorized")),
        SessionState::Unknown => Err(ApiError::service_unavailable("Backend temporarily unavailable")),
    }
}

/// Resolve the caller when a session is optional (public lookups that
/// annotate results for signed-in users)
pub async fn optional_user(jar: &CookieJar) -> Option<CurrentUser> {
    match resolve_session(Backend::shared(), jar).await.state {
        SessionState::Authenticated(user) => Some(user),
        _ => None,
    }
}
