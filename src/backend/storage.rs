use serde::Deserialize;
use serde_json::json;

use super::error::BackendError;
use super::Backend;

/// One object inside a bucket, as the storage API lists it
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
}

/// Blob storage surface of the backend service, scoped to one bucket
pub struct StorageBucket<'a> {
    backend: &'a Backend,
    bucket: String,
}

impl<'a> StorageBucket<'a> {
    pub(crate) fn new(backend: &'a Backend, bucket: impl Into<String>) -> Self {
        Self { backend, bucket: bucket.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.backend.base_url(), path)
    }

    fn request(&self, method: reqwest::Method, path: &str, access_token: &str) -> reqwest::RequestBuilder {
        self.backend
            .http()
            .request(method, self.url(path))
            .header("apikey", self.backend.anon_key())
            .bearer_auth(access_token)
    }

    /// List objects under a prefix, e.g. `{user_id}/`
    pub async fn list(&self, prefix: &str, access_token: &str) -> Result<Vec<ObjectInfo>, BackendError> {
        let response = self
            .request(reqwest::Method::POST, &format!("object/list/{}", self.bucket), access_token)
            .json(&json!({ "prefix": prefix }))
            .send()
            .await?;

        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Upload one object
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, &format!("object/{}/{}", self.bucket, path), access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(bytes)
            .send()
            .await?;

        Backend::check_status(response).await?;
        Ok(())
    }

    /// Remove a set of objects by full path
    pub async fn remove(&self, paths: &[String], access_token: &str) -> Result<(), BackendError> {
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .request(reqwest::Method::DELETE, &format!("object/{}", self.bucket), access_token)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        Backend::check_status(response).await?;
        Ok(())
    }

    /// Public URL for an object in a public bucket. No request is made;
    /// the service serves these unauthenticated.
    pub fn public_url(&self, path: &str) -> String {
        self.url(&format!("object/public/{}/{}", self.bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_includes_bucket_and_path() {
        let backend = Backend::new("http://localhost:54321/", "anon", 5);
        let bucket = backend.storage("avatars");
        assert_eq!(
            bucket.public_url("user-1/12345_photo.png"),
            "http://localhost:54321/storage/v1/object/public/avatars/user-1/12345_photo.png"
        );
    }
}
