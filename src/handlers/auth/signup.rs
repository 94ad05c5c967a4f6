use axum::response::{IntoResponse, Redirect};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::utils::{map_signup_error, redirect_with_params};
use crate::backend::Backend;
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: String,
}

/// POST /auth/signup - create an account and its (incomplete) profile.
///
/// All outcomes are redirects: back to /register with `error` (and the
/// offending `field`) on failure, to /login with a success toast
/// otherwise.
pub async fn signup_post(Form(form): Form<SignupForm>) -> impl IntoResponse {
    if form.email.is_empty() || form.password.is_empty() || form.username.is_empty() {
        return redirect_with_params("/register", &[("error", "Todos los campos son obligatorios")]);
    }

    if !validation::is_valid_email(&form.email) {
        return redirect_with_params(
            "/register",
            &[("error", "El formato del correo electrónico no es válido"), ("field", "email")],
        );
    }

    if !validation::is_valid_username(&form.username) {
        return redirect_with_params(
            "/register",
            &[
                (
                    "error",
                    "El nombre de usuario debe tener entre 3 y 20 caracteres, y solo puede contener letras, números y guiones bajos",
                ),
                ("field", "username"),
            ],
        );
    }

    let backend = Backend::shared();

    match username_exists(backend, &form.username).await {
        Ok(true) => {
            return redirect_with_params(
                "/register",
                &[("error", "El nombre de usuario ya está en uso"), ("field", "username")],
            );
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Error en registro: {}", e);
            return redirect_with_params("/register", &[("error", "Error interno del servidor")]);
        }
    }

    let user = match backend.auth().sign_up(&form.email, &form.password, &form.username).await {
        Ok(user) => user,
        Err(e) if e.status().is_some() => {
            let (message, field) = map_signup_error(e.backend_message());
            let mut params = vec![("error", message)];
            if let Some(field) = field {
                params.push(("field", field));
            }
            return redirect_with_params("/register", &params);
        }
        Err(e) => {
            tracing::error!("Error en registro: {}", e);
            return redirect_with_params("/register", &[("error", "Error interno del servidor")]);
        }
    };

    // A profile-insert failure must not fail the registration; the row
    // can be backfilled by the completion flow
    let now = Utc::now();
    let profile = json!({
        "id": user.id,
        "username": form.username,
        "email": form.email,
        "verificado": false,
        "completed": false,
        "created_at": now,
        "updated_at": now,
    });
    if let Err(e) = backend.table("perfil").insert(&profile).await {
        tracing::error!("Error creando perfil: {}", e);
    }

    redirect_with_params(
        "/login",
        &[
            ("msg", "signup_success"),
            ("desc", "Te has registrado con éxito. Revisa tu correo para activar la cuenta."),
        ],
    )
}

async fn username_exists(backend: &Backend, username: &str) -> Result<bool, crate::backend::error::BackendError> {
    backend.table("perfil").select("id").eq("username", username).exists().await
}
