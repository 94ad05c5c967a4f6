use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::utils::following_ids;
use crate::backend::Backend;
use crate::config;
use crate::middleware::session;
use crate::models::UserSummary;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/users/search?q= - user search.
///
/// Matching is delegated to the backend's `search_users` function; the
/// handler only drops the caller from the results and annotates each
/// entry with follow status.
pub async fn search_get(jar: CookieJar, Query(query): Query<SearchQuery>) -> impl IntoResponse {
    let term = query.q.as_deref().unwrap_or("").trim().to_string();
    if term.is_empty() {
        return (StatusCode::OK, Json(json!({ "users": [] })));
    }

    let current = session::optional_user(&jar).await;
    let backend = Backend::shared();

    let mut rpc = backend.rpc("search_users");
    if let Some(current) = &current {
        rpc = rpc.auth(&current.access_token);
    }

    let args = json!({
        "search_query": term,
        "limit_count": config::config().api.search_limit,
    });
    let users: Vec<UserSummary> = match rpc.call(&args).await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Search error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to search users" })),
            );
        }
    };

    let Some(current) = current else {
        return (StatusCode::OK, Json(json!({ "users": users })));
    };

    let mut filtered: Vec<UserSummary> = users.into_iter().filter(|u| u.id != current.id).collect();

    if !filtered.is_empty() {
        let follows = following_ids(backend, &current.access_token, current.id).await.unwrap_or_default();
        for user in &mut filtered {
            user.is_following = follows.contains(&user.id);
        }
    }

    (StatusCode::OK, Json(json!({ "users": filtered })))
}
