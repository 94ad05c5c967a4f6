use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

use super::utils::following_ids;
use crate::backend::Backend;
use crate::middleware::session;
use crate::models::UserSummary;

/// GET /api/users/:id/following - who a user follows, annotated with the
/// caller's own follow status for each entry
pub async fn following_get(jar: CookieJar, Path(id): Path<Uuid>) -> impl IntoResponse {
    let current = session::optional_user(&jar).await;
    let backend = Backend::shared();

    let access_token = current.as_ref().map(|u| u.access_token.clone()).unwrap_or_default();

    let followed = match following_ids(backend, &access_token, id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Error fetching following: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch following list" })),
            );
        }
    };

    if followed.is_empty() {
        return (StatusCode::OK, Json(json!({ "following": [] })));
    }

    let ids: Vec<Uuid> = followed.into_iter().collect();
    let mut table = backend.table("perfil").select("id,username,nombre,avatar_url").in_list("id", &ids);
    if !access_token.is_empty() {
        table = table.auth(&access_token);
    }
    let profiles: Vec<UserSummary> = match table.fetch().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Error fetching profiles: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch profiles" })),
            );
        }
    };

    let caller_follows: HashSet<Uuid> = match &current {
        Some(current) => following_ids(backend, &current.access_token, current.id).await.unwrap_or_default(),
        None => HashSet::new(),
    };

    let following: Vec<UserSummary> = profiles
        .into_iter()
        .map(|mut profile| {
            profile.is_following = caller_follows.contains(&profile.id);
            profile
        })
        .collect();

    (StatusCode::OK, Json(json!({ "following": following })))
}
