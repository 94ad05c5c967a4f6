use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use uuid::Uuid;

use super::utils::fetch_counters;
use crate::backend::Backend;
use crate::middleware::session;
use crate::models::Seguidor;

/// POST /api/users/:id/follow - follow a user.
///
/// The existence check makes the call idempotent at the API level: a
/// second follow reports "already following" instead of inserting a
/// duplicate edge. Self-follows are rejected here and by the service's
/// own constraint.
pub async fn follow_post(jar: CookieJar, Path(id): Path<Uuid>) -> impl IntoResponse {
    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))),
    };

    if user.id == id {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Cannot follow yourself" })));
    }

    let backend = Backend::shared();

    let already_following = backend
        .table("seguidores")
        .auth(&user.access_token)
        .eq("id_seguidor", user.id)
        .eq("id_seguido", id)
        .exists()
        .await;

    match already_following {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Already following this user" })),
            );
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Follow error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to follow user" })),
            );
        }
    }

    let edge = Seguidor { id_seguidor: user.id, id_seguido: id };
    if let Err(e) = backend.table("seguidores").auth(&user.access_token).insert(&edge).await {
        tracing::error!("Follow error: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to follow user" })),
        );
    }

    let (total_seguidores, total_siguiendo) = fetch_counters(backend, &user, user.id).await;
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Usted ha empezado a seguir este usuario",
            "total_seguidores": total_seguidores,
            "total_siguiendo": total_siguiendo,
        })),
    )
}

/// DELETE /api/users/:id/follow - unfollow a user. Deleting an absent
/// edge is a no-op and still reports success.
pub async fn follow_delete(jar: CookieJar, Path(id): Path<Uuid>) -> impl IntoResponse {
    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))),
    };

    let backend = Backend::shared();

    let deleted = backend
        .table("seguidores")
        .auth(&user.access_token)
        .eq("id_seguidor", user.id)
        .eq("id_seguido", id)
        .delete()
        .await;

    if let Err(e) = deleted {
        tracing::error!("Unfollow error: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to unfollow user" })),
        );
    }

    let (total_seguidores, total_siguiendo) = fetch_counters(backend, &user, user.id).await;
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Usted ha dejado de seguir a este usuario",
            "total_seguidores": total_seguidores,
            "total_siguiendo": total_siguiendo,
        })),
    )
}
