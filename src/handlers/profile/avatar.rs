use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::backend::Backend;
use crate::config;
use crate::middleware::session;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg"];
const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct AvatarQuery {
    pub filename: Option<String>,
}

/// POST /api/profile/avatar - replace the caller's avatar.
///
/// Two storage calls in sequence: remove whatever lives under the user's
/// prefix, then upload the new file. There is no transaction between
/// them; a failure after the removal leaves the user without an avatar.
pub async fn avatar_post(
    jar: CookieJar,
    Query(query): Query<AvatarQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))),
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Formato no soportado. Use PNG o JPG." })),
        );
    }

    if body.len() > MAX_AVATAR_BYTES {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "El archivo excede el tamaño máximo permitido (2MB). Por favor, selecciona una imagen más ligera.",
            })),
        );
    }

    let bucket_name = &config::config().backend.avatar_bucket;
    let storage = Backend::shared().storage(bucket_name.clone());
    let prefix = format!("{}/", user.id);

    // Clear out the previous avatar(s). Failures here are logged and
    // ignored; the upload below decides the request's outcome.
    match storage.list(&prefix, &user.access_token).await {
        Ok(existing) if !existing.is_empty() => {
            let paths: Vec<String> = existing.iter().map(|f| format!("{}{}", prefix, f.name)).collect();
            if let Err(e) = storage.remove(&paths, &user.access_token).await {
                tracing::warn!("Could not remove previous avatar for {}: {}", user.id, e);
            }
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not list avatars for {}: {}", user.id, e),
    }

    let filename = sanitize_filename(query.filename.as_deref(), &content_type);
    let path = format!("{}/{}_{}", user.id, Utc::now().timestamp_millis(), filename);

    match storage.upload(&path, body.to_vec(), &content_type, &user.access_token).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "url": storage.public_url(&path) }))),
        Err(e) => {
            tracing::error!("Avatar upload error for {}: {}", user.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "No se pudo subir la imagen" })),
            )
        }
    }
}

/// Keep the original file name when it is a plain name; anything
/// path-like or empty falls back to a content-type derived default
fn sanitize_filename(filename: Option<&str>, content_type: &str) -> String {
    let default_name = if content_type == "image/png" { "avatar.png" } else { "avatar.jpg" };
    match filename {
        Some(name)
            if !name.is_empty()
                && !name.contains(['/', '\\'])
                && !name.starts_with('.')
                && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')) =>
        {
            name.to_string()
        }
        _ => default_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_filenames() {
        assert_eq!(sanitize_filename(Some("foto_perfil.png"), "image/png"), "foto_perfil.png");
    }

    #[test]
    fn rejects_path_like_filenames() {
        assert_eq!(sanitize_filename(Some("../../etc/passwd"), "image/png"), "avatar.png");
        assert_eq!(sanitize_filename(Some("a/b.png"), "image/png"), "avatar.png");
        assert_eq!(sanitize_filename(Some(".hidden"), "image/jpeg"), "avatar.jpg");
        assert_eq!(sanitize_filename(None, "image/jpeg"), "avatar.jpg");
    }
}
