mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", server.base_url)).send().await?;

    // The test backend is unreachable, so the service reports degraded
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}
