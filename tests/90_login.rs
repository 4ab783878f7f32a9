mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_requires_email_and_password() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for body in [
        json!({"email": "jon@example.com"}),
        json!({"password": "hunter2"}),
        json!({"email": "", "password": "hunter2"}),
        json!({}),
    ] {
        let res = client
            .post(format!("{}/users", server.base_url))
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
    assert_eq!(server.store.count("users"), 0);
    Ok(())
}

#[tokio::test]
async fn register_stores_hash_not_plaintext() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({"email": "jon@example.com", "password": "hunter2"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert!(body["_id"].as_str().is_some());

    use staffdir_api::store::DocumentStore;
    let user = server
        .store
        .find_one("users", &json!({"email": "jon@example.com"}))
        .await?
        .expect("user document");
    let stored = user["password"].as_str().unwrap();
    assert_ne!(stored, "hunter2");
    assert!(stored.starts_with("$2"), "expected a bcrypt hash, got {}", stored);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_accepted() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let res = client
            .post(format!("{}/users", server.base_url))
            .json(&json!({"email": "jon@example.com", "password": "hunter2"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(server.store.count("users"), 2);
    Ok(())
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/users", server.base_url))
        .json(&json!({"email": "jon@example.com", "password": "hunter2"}))
        .send()
        .await?;

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"email": "jon@example.com", "password": "hunter2"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert!(body["accessToken"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/users", server.base_url))
        .json(&json!({"email": "jon@example.com", "password": "hunter2"}))
        .send()
        .await?;

    let wrong_password = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"email": "jon@example.com", "password": "nope"}))
        .send()
        .await?;
    let unknown_email = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"email": "ghost@example.com", "password": "nope"}))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies: no user-existence leak
    let a: serde_json::Value = wrong_password.json().await?;
    let b: serde_json::Value = unknown_email.json().await?;
    assert_eq!(a, b);
    assert!(a.get("accessToken").is_none());
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({"email": "jon@example.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
