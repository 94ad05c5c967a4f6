use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::backend::Backend;

#[derive(Debug, Deserialize)]
pub struct CheckUsernameQuery {
    pub username: Option<String>,
}

/// GET /api/auth/check-username - availability pre-check against the
/// profile table
pub async fn check_username_get(Query(query): Query<CheckUsernameQuery>) -> impl IntoResponse {
    let Some(username) = query.username else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Username is required" })));
    };

    match Backend::shared().table("perfil").select("id").eq("username", &username).exists().await {
        Ok(exists) => (StatusCode::OK, Json(json!({ "exists": exists }))),
        Err(e) => {
            tracing::error!("Error checking username: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Error checking username" })),
            )
        }
    }
}
