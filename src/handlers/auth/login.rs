use axum::response::{IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::utils::redirect_with_params;
use crate::backend::Backend;
use crate::middleware::session;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct CompletedRow {
    completed: Option<bool>,
}

/// POST /auth/login - password sign-in.
///
/// Any sign-in failure redirects to /error without detail. Success
/// issues the session cookie pair and lands on the dashboard or, for an
/// incomplete profile, on the completion page.
pub async fn login_post(jar: CookieJar, Form(form): Form<LoginForm>) -> impl IntoResponse {
    let backend = Backend::shared();

    let auth_session = match backend.auth().sign_in_with_password(&form.email, &form.password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Sign-in failed: {}", e);
            return Redirect::to("/error").into_response();
        }
    };

    let completed = match backend
        .table("perfil")
        .auth(&auth_session.access_token)
        .select("completed")
        .eq("id", auth_session.user.id)
        .fetch_optional::<CompletedRow>()
        .await
    {
        Ok(row) => row.and_then(|r| r.completed).unwrap_or(false),
        Err(e) => {
            tracing::warn!("Could not read completion flag after login: {}", e);
            false
        }
    };

    let mut jar = jar;
    for cookie in session::session_cookies(&auth_session) {
        jar = jar.add(cookie);
    }

    let redirect = if completed {
        redirect_with_params(
            "/dashboard",
            &[("msg", "login_success"), ("desc", "Has iniciado sesión con éxito")],
        )
    } else {
        Redirect::to("/account/complete")
    };

    (jar, redirect).into_response()
}
