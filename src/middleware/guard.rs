use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::backend::Backend;
use crate::middleware::session::{self, CurrentUser, SessionState};

/// Pages reachable without a session
const PUBLIC_PATHS: &[&str] = &["/login", "/register", "/forgot-password", "/reset-password", "/error"];

/// Paths the completion gate does not apply to
const COMPLETE_PROFILE_PATH: &str = "/account/complete";

const STATIC_EXTENSIONS: &[&str] =
    &["ico", "png", "jpg", "jpeg", "svg", "css", "js", "woff", "woff2", "ttf", "webp"];

/// What the guard knows about the caller when it decides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPresence {
    /// Backend unreachable; presence undecidable
    Unknown,
    Anonymous,
    Authenticated { profile_completed: bool },
}

/// Terminal outcomes of the access-control decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    ToLogin,
    ToCompleteProfile,
    ToDashboard,
}

/// The access-control policy: a pure function of (path, presence,
/// completion). Evaluated in order:
///
///   1. public, API or static path        -> allow
///   2. no session                        -> login
///   3. incomplete, not on complete page  -> complete-profile
///   4. complete, on complete page        -> dashboard
///   5. otherwise                         -> allow
///
/// When presence is undecidable (backend unreachable) the guard fails
/// open: availability over strictness.
pub fn decide(path: &str, session: SessionPresence) -> GuardDecision {
    if is_public_path(path) || is_api_path(path) || is_static_asset(path) {
        return GuardDecision::Allow;
    }

    let profile_completed = match session {
        SessionPresence::Unknown => return GuardDecision::Allow,
        SessionPresence::Anonymous => return GuardDecision::ToLogin,
        SessionPresence::Authenticated { profile_completed } => profile_completed,
    };

    let on_complete_page = path.starts_with(COMPLETE_PROFILE_PATH);
    if !profile_completed && !on_complete_page {
        return GuardDecision::ToCompleteProfile;
    }
    if profile_completed && on_complete_page {
        return GuardDecision::ToDashboard;
    }

    GuardDecision::Allow
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| path.starts_with(p))
}

pub fn is_api_path(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/auth")
}

pub fn is_static_asset(path: &str) -> bool {
    if path.starts_with("/img") || path.starts_with("/favicon") {
        return true;
    }
    path.rsplit_once('.')
        .map(|(_, ext)| STATIC_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

#[derive(Debug, Deserialize)]
struct CompletedRow {
    completed: Option<bool>,
}

/// Axum middleware applying the decision table to every page request.
/// Resolves the session from cookies (re-issuing them when the access
/// token was refreshed), looks up the completion flag, redirects or
/// passes through with the current user injected as an extension.
pub async fn guard_middleware(jar: CookieJar, mut request: Request, next: Next) -> Response {
    // Public, API and asset paths never need a session; skip the
    // backend round-trips entirely
    {
        let path = request.uri().path();
        if is_public_path(path) || is_api_path(path) || is_static_asset(path) {
            return next.run(request).await;
        }
    }

    let backend = Backend::shared();
    let resolved = session::resolve_session(backend, &jar).await;

    let presence = match &resolved.state {
        SessionState::Unknown => SessionPresence::Unknown,
        SessionState::Anonymous => SessionPresence::Anonymous,
        SessionState::Authenticated(user) => match fetch_profile_completed(backend, user).await {
            Ok(completed) => SessionPresence::Authenticated { profile_completed: completed },
            Err(e) => {
                // Fail open rather than locking the whole app out
                tracing::warn!("Guard could not resolve completion flag: {}", e);
                SessionPresence::Unknown
            }
        },
    };

    let mut response = match decide(request.uri().path(), presence) {
        GuardDecision::Allow => {
            if let SessionState::Authenticated(user) = resolved.state {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        GuardDecision::ToLogin => Redirect::to("/login").into_response(),
        GuardDecision::ToCompleteProfile => Redirect::to(COMPLETE_PROFILE_PATH).into_response(),
        GuardDecision::ToDashboard => Redirect::to("/dashboard").into_response(),
    };

    if let Some(session) = resolved.refreshed {
        for cookie in session::session_cookies(&session) {
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
    }

    response
}

async fn fetch_profile_completed(
    backend: &Backend,
    user: &CurrentUser,
) -> Result<bool, crate::backend::error::BackendError> {
    let row: Option<CompletedRow> = backend
        .table("perfil")
        .auth(&user.access_token)
        .select("completed")
        .eq("id", user.id)
        .fetch_optional()
        .await?;

    Ok(row.and_then(|r| r.completed).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: SessionPresence = SessionPresence::Anonymous;
    const UNKNOWN: SessionPresence = SessionPresence::Unknown;
    const INCOMPLETE: SessionPresence = SessionPresence::Authenticated { profile_completed: false };
    const COMPLETE: SessionPresence = SessionPresence::Authenticated { profile_completed: true };

    #[test]
    fn public_paths_never_redirect() {
        for path in ["/login", "/register", "/forgot-password", "/reset-password", "/error", "/login?msg=x"] {
            for session in [ANON, UNKNOWN, INCOMPLETE, COMPLETE] {
                assert_eq!(decide(path, session), GuardDecision::Allow, "path {}", path);
            }
        }
    }

    #[test]
    fn api_and_static_paths_pass_through() {
        for path in ["/api/users/search", "/auth/signup", "/img/logo.png", "/favicon.ico", "/styles/app.css"] {
            assert_eq!(decide(path, ANON), GuardDecision::Allow, "path {}", path);
        }
    }

    #[test]
    fn anonymous_users_go_to_login() {
        for path in ["/", "/dashboard", "/account", "/account/complete", "/users/abc"] {
            assert_eq!(decide(path, ANON), GuardDecision::ToLogin, "path {}", path);
        }
    }

    #[test]
    fn incomplete_profiles_are_gated() {
        for path in ["/", "/dashboard", "/account", "/users/abc"] {
            assert_eq!(decide(path, INCOMPLETE), GuardDecision::ToCompleteProfile, "path {}", path);
        }
        // already on the completion page: no redirect loop
        assert_eq!(decide("/account/complete", INCOMPLETE), GuardDecision::Allow);
    }

    #[test]
    fn completed_profiles_leave_the_completion_page() {
        assert_eq!(decide("/account/complete", COMPLETE), GuardDecision::ToDashboard);
        assert_eq!(decide("/dashboard", COMPLETE), GuardDecision::Allow);
        assert_eq!(decide("/account", COMPLETE), GuardDecision::Allow);
    }

    #[test]
    fn unreachable_backend_fails_open() {
        for path in ["/", "/dashboard", "/account/complete"] {
            assert_eq!(decide(path, UNKNOWN), GuardDecision::Allow, "path {}", path);
        }
    }
}
