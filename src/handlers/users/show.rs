use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use uuid::Uuid;

use super::utils::fetch_counters;
use crate::backend::Backend;
use crate::middleware::session;
use crate::models::{EventoFavorito, Perfil};

/// GET /api/users/:id - public profile with counters, follow status and
/// the target's favorite events. One's own id is rejected; the account
/// page serves that view.
pub async fn user_get(jar: CookieJar, Path(id): Path<Uuid>) -> impl IntoResponse {
    let current = session::optional_user(&jar).await;

    if current.as_ref().is_some_and(|u| u.id == id) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Para ver tu propio perfil debes ir a Mi Perfil" })),
        );
    }

    let backend = Backend::shared();
    let anon = String::new();
    let access_token = current.as_ref().map(|u| u.access_token.clone()).unwrap_or(anon);

    let profile: Option<Perfil> = match query(backend, &access_token, "perfil").eq("id", id).fetch_optional().await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("User lookup error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            );
        }
    };

    let Some(profile) = profile else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "User not found" })));
    };

    let mut is_following = false;
    if let Some(current) = &current {
        is_following = backend
            .table("seguidores")
            .auth(&current.access_token)
            .eq("id_seguidor", current.id)
            .eq("id_seguido", id)
            .exists()
            .await
            .unwrap_or(false);
    }

    let (total_seguidores, total_siguiendo) = match &current {
        Some(current) => fetch_counters(backend, current, id).await,
        None => (0, 0),
    };

    let favorite_events: Vec<EventoFavorito> = query(backend, &access_token, "eventos_favoritos")
        .eq("id_usuario", id)
        .order("creado_en", false)
        .fetch()
        .await
        .unwrap_or_default();

    // Profile merged with the counter columns, as one flat object
    let mut merged = match serde_json::to_value(&profile) {
        Ok(Value::Object(map)) => map,
        _ => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            );
        }
    };
    merged.insert("total_seguidores".to_string(), json!(total_seguidores));
    merged.insert("total_siguiendo".to_string(), json!(total_siguiendo));
    merged.insert("is_following".to_string(), json!(is_following));

    (
        StatusCode::OK,
        Json(json!({
            "profile": merged,
            "favoriteEvents": favorite_events,
        })),
    )
}

fn query<'a>(backend: &'a Backend, access_token: &str, table: &str) -> crate::backend::query::Table<'a> {
    let table = backend.table(table.to_string());
    if access_token.is_empty() {
        table
    } else {
        table.auth(access_token)
    }
}
