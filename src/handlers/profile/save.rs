use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::backend::Backend;
use crate::middleware::session;
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(default)]
    pub nombre: String,
    pub edad: Option<i32>,
    #[serde(default)]
    pub intereses: Vec<String>,
    pub interes_otro: Option<String>,
    #[serde(default)]
    pub ubicacion: String,
    pub biografia: Option<String>,
    pub avatar_url: Option<String>,
}

/// POST /api/profile/save - create-or-update the caller's profile and
/// mark it completed.
///
/// The write is update-if-exists else insert, two calls with no
/// transaction between them, mirroring the backing service's API.
pub async fn profile_save_post(jar: CookieJar, Json(body): Json<SaveProfileRequest>) -> impl IntoResponse {
    if let Some(field_errors) = validate(&body) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "errors": field_errors })),
        );
    }

    let user = match session::require_user(&jar).await {
        Ok(user) => user,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false }))),
    };

    // The "Otros" interest needs its free-text companion
    if body.intereses.iter().any(|i| i == validation::INTERES_OTROS)
        && !validation::is_valid_interes_otro(body.interes_otro.as_deref())
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "message": "Interés \"Otros\" requiere texto válido (solo letras, max 40).",
            })),
        );
    }

    let payload = json!({
        "id": user.id,
        "nombre": body.nombre,
        "edad": body.edad,
        "ubicacion": body.ubicacion,
        "biografia": body.biografia,
        "avatar_url": body.avatar_url,
        "intereses": body.intereses,
        "interes_otro": body.interes_otro,
        "verificado": true,
        "completed": true,
        "updated_at": Utc::now(),
    });

    let backend = Backend::shared();
    let table = || backend.table("perfil").auth(&user.access_token);

    let result = match table().select("id").eq("id", user.id).exists().await {
        Ok(true) => table().eq("id", user.id).update(&payload).await,
        Ok(false) => table().insert(&payload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!("Profile save error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.backend_message() })),
            )
        }
    }
}

fn validate(body: &SaveProfileRequest) -> Option<HashMap<&'static str, &'static str>> {
    let mut errors = HashMap::new();

    if body.nombre.is_empty() || !validation::is_letters_only(&body.nombre) {
        errors.insert("nombre", "El nombre sólo puede contener letras y espacios");
    }
    match body.edad {
        Some(edad) if validation::is_valid_age(edad) => {}
        _ => {
            errors.insert("edad", "La edad debe estar entre 1 y 120");
        }
    }
    if body.ubicacion.is_empty() {
        errors.insert("ubicacion", "La ubicación es obligatoria");
    }
    if let Some(biografia) = &body.biografia {
        if biografia.chars().count() > validation::MAX_BIOGRAFIA_LEN {
            errors.insert("biografia", "La biografía no puede superar 500 caracteres");
        }
    }
    if let Some(interes_otro) = &body.interes_otro {
        if interes_otro.chars().count() > validation::MAX_INTERES_OTRO_LEN {
            errors.insert("interes_otro", "Máximo 40 caracteres");
        }
    }
    if let Some(avatar_url) = &body.avatar_url {
        if url::Url::parse(avatar_url).is_err() {
            errors.insert("avatar_url", "URL inválida");
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SaveProfileRequest {
        SaveProfileRequest {
            nombre: "María José".to_string(),
            edad: Some(24),
            intereses: vec!["Arte".to_string()],
            interes_otro: None,
            ubicacion: "Medellín".to_string(),
            biografia: Some("Hola".to_string()),
            avatar_url: None,
        }
    }

    #[test]
    fn accepts_a_complete_payload() {
        assert!(validate(&valid_request()).is_none());
    }

    #[test]
    fn rejects_numbers_in_names() {
        let mut request = valid_request();
        request.nombre = "María 22".to_string();
        assert!(validate(&request).unwrap().contains_key("nombre"));
    }

    #[test]
    fn rejects_out_of_range_ages() {
        for edad in [None, Some(0), Some(121), Some(-3)] {
            let mut request = valid_request();
            request.edad = edad;
            assert!(validate(&request).unwrap().contains_key("edad"), "edad {:?}", edad);
        }
    }

    #[test]
    fn rejects_oversized_biografia() {
        let mut request = valid_request();
        request.biografia = Some("a".repeat(501));
        assert!(validate(&request).unwrap().contains_key("biografia"));
    }

    #[test]
    fn rejects_malformed_avatar_urls() {
        let mut request = valid_request();
        request.avatar_url = Some("no es una url".to_string());
        assert!(validate(&request).unwrap().contains_key("avatar_url"));
    }
}
