use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::BackendError;
use super::Backend;

/// Identity record as the auth service reports it. The application only
/// ever reads the id and email; everything profile-shaped lives in the
/// `perfil` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

/// Opaque token pair minted by the auth service. The application stores
/// both in cookies and never inspects the tokens themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Auth surface of the backend service
pub struct AuthApi<'a> {
    backend: &'a Backend,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.backend.base_url(), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.backend
            .http()
            .request(method, self.url(path))
            .header("apikey", self.backend.anon_key())
            .bearer_auth(self.backend.anon_key())
    }

    fn request_as_user(&self, method: reqwest::Method, path: &str, access_token: &str) -> reqwest::RequestBuilder {
        self.backend
            .http()
            .request(method, self.url(path))
            .header("apikey", self.backend.anon_key())
            .bearer_auth(access_token)
    }

    /// Create an account. The username travels in the metadata blob the
    /// service attaches to the identity; the profile row itself is
    /// created by the caller afterwards.
    pub async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "username": username },
            }))
            .send()
            .await?;

        let body: Value = Backend::check_status(response).await?.json().await?;

        // The service answers with the bare user when email confirmation
        // is pending, or a full session when it is disabled
        let user_value = match body.get("user") {
            Some(user) => user.clone(),
            None => body,
        };
        serde_json::from_value(user_value).map_err(|e| BackendError::Decode(e.to_string()))
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "token?grant_type=password")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "token?grant_type=refresh_token")
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send a magic-link / OTP email
    pub async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "otp")
            .json(&json!({
                "email": email,
                "create_user": false,
                "gotrue_meta_security": {},
                "redirect_to": redirect_to,
            }))
            .send()
            .await?;

        Backend::check_status(response).await?;
        Ok(())
    }

    /// Verify an emailed OTP token hash (signup confirmation, recovery)
    pub async fn verify_otp(&self, otp_type: &str, token_hash: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .request(reqwest::Method::POST, "verify")
            .json(&json!({ "type": otp_type, "token_hash": token_hash }))
            .send()
            .await?;

        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send a password-recovery email pointing at `redirect_to`
    pub async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "recover")
            .json(&json!({ "email": email, "redirect_to": redirect_to }))
            .send()
            .await?;

        Backend::check_status(response).await?;
        Ok(())
    }

    /// Update the authenticated user's password
    pub async fn update_password(&self, access_token: &str, new_password: &str) -> Result<(), BackendError> {
        let response = self
            .request_as_user(reqwest::Method::PUT, "user", access_token)
            .json(&json!({ "password": new_password }))
            .send()
            .await?;

        Backend::check_status(response).await?;
        Ok(())
    }

    /// Resolve the user behind an access token. A 401 means the token is
    /// stale (the caller may try the refresh token); transport errors
    /// mean the service is unreachable.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .request_as_user(reqwest::Method::GET, "user", access_token)
            .send()
            .await?;

        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }
}
