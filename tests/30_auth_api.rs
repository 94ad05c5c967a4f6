mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn check_email_requires_the_parameter() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/auth/check-email", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn check_email_rejects_malformed_addresses() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for email in ["no-arroba", "a@b", "a @b.com", "@dominio.com"] {
        let res = client
            .get(format!("{}/api/auth/check-email", server.base_url))
            .query(&[("email", email)])
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["valid"], false, "email {}", email);
        assert_eq!(body["message"], "Formato de email inválido", "email {}", email);
    }
    Ok(())
}

#[tokio::test]
async fn check_email_rejects_disposable_domains() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for email in ["x@mailinator.com", "y@yopmail.com", "z@sub.guerrillamail.com"] {
        let res = client
            .get(format!("{}/api/auth/check-email", server.base_url))
            .query(&[("email", email)])
            .send()
            .await?;

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["valid"], false, "email {}", email);
        assert_eq!(body["message"], "No se permiten correos electrónicos temporales", "email {}", email);
    }
    Ok(())
}

#[tokio::test]
async fn check_email_accepts_regular_addresses() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/check-email", server.base_url))
        .query(&[("email", "maria@example.com")])
        .send()
        .await?;

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["valid"], true);
    assert_eq!(body["exists"], false);
    assert_eq!(body["message"], "Email disponible");
    Ok(())
}

#[tokio::test]
async fn signup_validates_before_touching_the_backend() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::no_redirect_client();

    // Missing fields
    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .form(&[("email", ""), ("password", ""), ("username", "")])
        .send()
        .await?;
    assert!(res.status().is_redirection());
    let location = res.headers()["location"].to_str()?;
    assert!(location.starts_with("/register?"), "location {}", location);
    assert!(location.contains("error="), "location {}", location);

    // Bad email format, blamed on the email field
    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .form(&[("email", "no-es-email"), ("password", "Segura#1x"), ("username", "maria_22")])
        .send()
        .await?;
    let location = res.headers()["location"].to_str()?;
    assert!(location.contains("field=email"), "location {}", location);

    // Bad username, blamed on the username field
    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .form(&[("email", "maria@example.com"), ("password", "Segura#1x"), ("username", "ab")])
        .send()
        .await?;
    let location = res.headers()["location"].to_str()?;
    assert!(location.contains("field=username"), "location {}", location);
    Ok(())
}

#[tokio::test]
async fn reset_password_rejects_mismatch_and_weak_passwords() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/reset-password", server.base_url))
        .json(&serde_json::json!({ "password": "Segura#1x", "confirmPassword": "Otra#1xyz" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Las contraseñas no coinciden");

    let res = client
        .post(format!("{}/api/auth/reset-password", server.base_url))
        .json(&serde_json::json!({ "password": "sindigitos", "confirmPassword": "sindigitos" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["error"].as_str().unwrap_or_default().contains("mínimo 8 caracteres"));
    Ok(())
}

#[tokio::test]
async fn resend_requires_an_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/resend", server.base_url))
        .form(&[("email", "")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "missing_email");
    Ok(())
}

#[tokio::test]
async fn confirm_without_token_lands_on_the_error_page() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::no_redirect_client();

    let res = client.get(format!("{}/auth/confirm", server.base_url)).send().await?;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"].to_str()?, "/error");
    Ok(())
}
