use axum::extract::Query;
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;

use super::utils::redirect_with_params;
use crate::backend::Backend;

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub otp_type: Option<String>,
}

/// GET /auth/confirm - verify an emailed confirmation link.
///
/// The redirect never carries the secret token onwards: success lands on
/// /login with a toast, failure on /error with the service's description.
pub async fn confirm_get(Query(query): Query<ConfirmQuery>) -> impl IntoResponse {
    let (Some(token_hash), Some(otp_type)) = (query.token_hash, query.otp_type) else {
        return Redirect::to("/error").into_response();
    };

    match Backend::shared().auth().verify_otp(&otp_type, &token_hash).await {
        Ok(_) => redirect_with_params(
            "/login",
            &[
                ("msg", "confirm_success"),
                ("desc", "Tu cuenta ha sido activada con éxito. Ya puedes iniciar sesión."),
            ],
        )
        .into_response(),
        Err(e) => {
            let description = match e.backend_message() {
                "" => "Email link is invalid or has expired".to_string(),
                msg => msg.to_string(),
            };
            let code = e.status().map(|s| s.to_string()).unwrap_or_else(|| "error".to_string());
            redirect_with_params(
                "/error",
                &[
                    ("error", "access_denied"),
                    ("error_code", &code),
                    ("error_description", &description),
                ],
            )
            .into_response()
        }
    }
}
