//! JSON view models for the application's pages. The route guard runs
//! in front of everything here except the public auth pages; the display
//! layer renders one view model per page and reads the toast parameters
//! the redirects carry.

use axum::extract::{Extension, Path, Query};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::Backend;
use crate::middleware::session::CurrentUser;
use crate::models::{Evento, EventoFavorito, Perfil};
use crate::validation;

/// Status parameters a redirect may have attached; the client renders
/// them as a toast
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ToastParams {
    pub msg: Option<String>,
    pub desc: Option<String>,
    pub error: Option<String>,
    pub field: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
}

fn page_view(page: &str, toast: ToastParams, extra: Value) -> Json<Value> {
    let mut view = json!({ "page": page, "toast": toast });
    if let Value::Object(extra) = extra {
        if let Value::Object(map) = &mut view {
            map.extend(extra);
        }
    }
    Json(view)
}

// -- Public pages -----------------------------------------------------

pub async fn login_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("login", toast, json!({}))
}

pub async fn register_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("register", toast, json!({}))
}

pub async fn forgot_password_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("forgot_password", toast, json!({}))
}

pub async fn reset_password_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("reset_password", toast, json!({}))
}

pub async fn error_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("error", toast, json!({}))
}

// -- Guarded pages ----------------------------------------------------

pub async fn home_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("home", toast, json!({}))
}

#[derive(Debug, Deserialize)]
struct FavoriteIdRow {
    id_evento: Uuid,
}

/// Dashboard: the event listing plus the ids the caller has favorited
pub async fn dashboard_page(
    user: Option<Extension<CurrentUser>>,
    Query(toast): Query<ToastParams>,
) -> Json<Value> {
    let backend = Backend::shared();

    let mut eventos: Vec<Evento> = vec![];
    let mut favoritos: Vec<Uuid> = vec![];

    if let Some(Extension(user)) = &user {
        eventos = backend
            .table("eventos")
            .auth(&user.access_token)
            .order("fecha_inicio", true)
            .fetch()
            .await
            .unwrap_or_default();

        let rows: Vec<FavoriteIdRow> = backend
            .table("eventos_favoritos")
            .auth(&user.access_token)
            .select("id_evento")
            .eq("id_usuario", user.id)
            .fetch()
            .await
            .unwrap_or_default();
        favoritos = rows.into_iter().map(|r| r.id_evento).collect();
    }

    page_view("dashboard", toast, json!({ "eventos": eventos, "favoritos": favoritos }))
}

/// Account: own profile with favorites, the "Mi Perfil" view
pub async fn account_page(user: Option<Extension<CurrentUser>>, Query(toast): Query<ToastParams>) -> Json<Value> {
    let backend = Backend::shared();

    let mut profile: Option<Perfil> = None;
    let mut favorites: Vec<EventoFavorito> = vec![];

    if let Some(Extension(user)) = &user {
        profile = backend
            .table("perfil")
            .auth(&user.access_token)
            .eq("id", user.id)
            .fetch_optional()
            .await
            .unwrap_or(None);

        favorites = backend
            .table("eventos_favoritos")
            .auth(&user.access_token)
            .eq("id_usuario", user.id)
            .order("creado_en", false)
            .fetch()
            .await
            .unwrap_or_default();
    }

    page_view("account", toast, json!({ "profile": profile, "favoriteEvents": favorites }))
}

/// Completion form metadata: the interest catalog the form offers
pub async fn complete_profile_page(Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("complete_profile", toast, json!({ "intereses": validation::INTERESES_CATALOGO }))
}

/// Edit form: the current profile values to prefill
pub async fn edit_profile_page(user: Option<Extension<CurrentUser>>, Query(toast): Query<ToastParams>) -> Json<Value> {
    let mut profile: Option<Perfil> = None;

    if let Some(Extension(user)) = &user {
        profile = Backend::shared()
            .table("perfil")
            .auth(&user.access_token)
            .eq("id", user.id)
            .fetch_optional()
            .await
            .unwrap_or(None);
    }

    page_view(
        "edit_profile",
        toast,
        json!({ "profile": profile, "intereses": validation::INTERESES_CATALOGO }),
    )
}

/// Another user's profile page; the client loads the data from
/// /api/users/:id
pub async fn user_profile_page(Path(id): Path<Uuid>, Query(toast): Query<ToastParams>) -> Json<Value> {
    page_view("user_profile", toast, json!({ "id": id }))
}
