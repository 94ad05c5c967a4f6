mod common;

use anyhow::Result;
use reqwest::StatusCode;

const SOME_ID: &str = "0b87e1e9-6bb4-4f8c-a8ad-1a2b3c4d5e6f";

#[tokio::test]
async fn follow_requires_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/users/{}/follow", server.base_url, SOME_ID))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Unauthorized");

    let res = client
        .delete(format!("{}/api/users/{}/follow", server.base_url, SOME_ID))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn search_with_a_blank_query_returns_no_users() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for url in [
        format!("{}/api/users/search", server.base_url),
        format!("{}/api/users/search?q=", server.base_url),
        format!("{}/api/users/search?q=%20%20", server.base_url),
    ] {
        let res = client.get(&url).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "url {}", url);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["users"], serde_json::json!([]), "url {}", url);
    }
    Ok(())
}

#[tokio::test]
async fn favorites_require_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/favorites", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/events/{}/favorite", server.base_url, SOME_ID))
        .json(&serde_json::json!({ "titulo": "Festival" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn profile_save_validates_the_payload_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Invalid payload is rejected before any session lookup
    let res = client
        .post(format!("{}/api/profile/save", server.base_url))
        .json(&serde_json::json!({
            "nombre": "María 22",
            "edad": 0,
            "intereses": ["Arte"],
            "ubicacion": "",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["ok"], false);
    assert!(body["errors"].get("nombre").is_some());
    assert!(body["errors"].get("edad").is_some());
    assert!(body["errors"].get("ubicacion").is_some());

    // A valid payload without a session is unauthorized
    let res = client
        .post(format!("{}/api/profile/save", server.base_url))
        .json(&serde_json::json!({
            "nombre": "María José",
            "edad": 24,
            "intereses": ["Arte"],
            "ubicacion": "Medellín",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["ok"], false);
    Ok(())
}

#[tokio::test]
async fn profile_endpoints_require_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/profile", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/profile/avatar", server.base_url))
        .header("content-type", "image/png")
        .body(vec![0u8; 16])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
