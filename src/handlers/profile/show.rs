use axum_extra::extract::cookie::CookieJar;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::session;
use crate::models::Perfil;

/// GET /api/profile - the caller's own profile row
pub async fn profile_get(jar: CookieJar) -> ApiResult<Perfil> {
    let user = session::require_user(&jar).await?;

    let profile: Option<Perfil> = Backend::shared()
        .table("perfil")
        .auth(&user.access_token)
        .eq("id", user.id)
        .fetch_optional()
        .await?;

    match profile {
        Some(profile) => Ok(ApiResponse::success(profile)),
        None => Err(ApiError::not_found("User not found")),
    }
}
