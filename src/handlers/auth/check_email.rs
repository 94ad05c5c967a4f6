use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::validation;

#[derive(Debug, Deserialize)]
pub struct CheckEmailQuery {
    pub email: Option<String>,
}

/// GET /api/auth/check-email - availability pre-check for the
/// registration form.
///
/// Entirely local: format and throwaway-domain checks only. Whether the
/// address is actually registered is decided by the auth service at
/// sign-up, which rejects duplicates itself.
pub async fn check_email_get(Query(query): Query<CheckEmailQuery>) -> impl IntoResponse {
    let Some(email) = query.email else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Email is required" })));
    };

    if !validation::is_valid_email(&email) {
        return (
            StatusCode::OK,
            Json(json!({
                "exists": false,
                "valid": false,
                "message": "Formato de email inválido",
            })),
        );
    }

    if validation::is_disposable_email(&email) {
        return (
            StatusCode::OK,
            Json(json!({
                "exists": false,
                "valid": false,
                "message": "No se permiten correos electrónicos temporales",
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "exists": false,
            "valid": true,
            "message": "Email disponible",
        })),
    )
}
