use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use crate::backend::Backend;
use crate::config;

#[derive(Debug, Deserialize)]
pub struct ResendForm {
    #[serde(default)]
    pub email: String,
}

/// POST /api/auth/resend - re-send the confirmation / magic-link email
pub async fn resend_post(Form(form): Form<ResendForm>) -> impl IntoResponse {
    if form.email.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing_email" })));
    }

    let redirect_to = format!("{}/auth/confirm", config::config().backend.site_url);
    match Backend::shared().auth().sign_in_with_otp(&form.email, &redirect_to).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.backend_message() }))),
    }
}
