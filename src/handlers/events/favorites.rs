use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::Backend;
use crate::middleware::session;
use crate::models::EventoFavorito;

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub titulo: Option<String>,
}

/// POST /api/events/:id/favorite - toggle a favorite.
///
/// Deletes the (user, event) row when it exists, inserts it (with the
/// cached title) otherwise, and reports the resulting state.
pub async fn favorite_post(
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(body): Json<FavoriteRequest>,
) -> impl IntoResponse {
    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))),
    };

    let backend = Backend::shared();
    let table = || {
        backend
            .table("eventos_favoritos")
            .auth(&user.access_token)
            .eq("id_usuario", user.id)
            .eq("id_evento", id)
    };

    let existing = match table().exists().await {
        Ok(existing) => existing,
        Err(e) => {
            tracing::error!("Favorite lookup error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            );
        }
    };

    let result = if existing {
        table().delete().await
    } else {
        let row = json!({
            "id_usuario": user.id,
            "id_evento": id,
            "titulo_evento": body.titulo,
        });
        backend.table("eventos_favoritos").auth(&user.access_token).insert(&row).await
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "favorited": !existing })),
        ),
        Err(e) => {
            tracing::error!("Favorite toggle error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        }
    }
}

/// GET /api/favorites - the caller's favorite events, newest first
pub async fn favorites_get(jar: CookieJar) -> impl IntoResponse {
    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))),
    };

    let favorites: Result<Vec<EventoFavorito>, _> = Backend::shared()
        .table("eventos_favoritos")
        .auth(&user.access_token)
        .eq("id_usuario", user.id)
        .order("creado_en", false)
        .fetch()
        .await;

    match favorites {
        Ok(favorites) => (StatusCode::OK, Json(json!({ "favorites": favorites }))),
        Err(e) => {
            tracing::error!("Favorites list error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        }
    }
}
