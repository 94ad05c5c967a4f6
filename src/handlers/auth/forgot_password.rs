use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::backend::Backend;
use crate::config;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// POST /api/auth/forgot-password - request a password-reset email.
///
/// Unknown emails are reported as such (the product chose clarity over
/// user-enumeration hardening); the service's rate limit is surfaced as
/// a 429 with its own message.
pub async fn forgot_password_post(Json(body): Json<ForgotPasswordRequest>) -> impl IntoResponse {
    if body.email.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Email is required" })));
    }

    let backend = Backend::shared();

    let known = backend
        .table("perfil")
        .select("email")
        .eq("email", &body.email)
        .exists()
        .await;

    match known {
        Ok(false) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Este usuario no existe, por favor regístrese",
                    "success": false,
                })),
            );
        }
        Ok(true) => {}
        Err(e) => {
            tracing::error!("Password reset lookup error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "success": false })),
            );
        }
    }

    let redirect_to = format!("{}/reset-password", config::config().backend.site_url);
    match backend.auth().reset_password_for_email(&body.email, &redirect_to).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Se ha enviado un correo electrónico con instrucciones para restablecer su contraseña",
            })),
        ),
        Err(e) if e.status() == Some(429) || e.backend_message().contains("rate limit") => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Ha excedido el límite de solicitudes. Por favor espere unos minutos antes de intentar nuevamente.",
                "success": false,
            })),
        ),
        Err(e) => {
            tracing::error!("Password reset error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "No se pudo enviar el correo de recuperación. Intente más tarde.",
                    "success": false,
                })),
            )
        }
    }
}
