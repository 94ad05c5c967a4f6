use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::backend::Backend;
use crate::middleware::session;
use crate::validation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// POST /api/auth/reset-password - set a new password under the recovery
/// session established by the emailed link
pub async fn reset_password_post(jar: CookieJar, Json(body): Json<ResetPasswordRequest>) -> impl IntoResponse {
    if body.password.is_empty() || body.confirm_password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Password and confirmation are required", "success": false })),
        );
    }

    if body.password != body.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Las contraseñas no coinciden", "success": false })),
        );
    }

    if !validation::is_valid_password(&body.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "La contraseña debe tener mínimo 8 caracteres, con mayúsculas, minúsculas, números y caracteres especiales( #, *, _, /, -, ., %, ?)",
                "success": false,
            })),
        );
    }

    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
            return (status, Json(json!({ "error": e.message(), "success": false })));
        }
    };

    match Backend::shared().auth().update_password(&user.access_token, &body.password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Se cambió la contraseña" })),
        ),
        Err(e) => {
            tracing::error!("Password update error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update password", "success": false })),
            )
        }
    }
}
