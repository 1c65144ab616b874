//! E2E tests for the auth routes

mod common;

use std::time::Duration;

use common::TestServer;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use vroom_api::ApiConfig;

#[tokio::test]
async fn test_signup_returns_user_and_token() {
    let server = TestServer::start().await;

    let response = server
        .post("/auth/signup")
        .json(&json!({
            "email": "  Jane@Example.com ",
            "password": "supersecret",
            "name": " Jane Doe ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["name"], "Jane Doe");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["token"].as_str().unwrap().len(), 32);
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_signup_validation() {
    let server = TestServer::start().await;

    let cases = [
        json!({ "email": "not-an-email", "password": "supersecret", "name": "A" }),
        json!({ "email": "a@b.c", "password": "short", "name": "A" }),
        json!({ "email": "a@b.c", "password": "supersecret", "name": "   " }),
    ];
    for case in cases {
        let response = server.post("/auth/signup").json(&case).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", case);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let server = TestServer::start().await;
    server.signup("dup@example.com").await;

    let response = server
        .post("/auth/signup")
        .json(&json!({
            "email": "DUP@example.com",
            "password": "anotherpassword",
            "name": "Someone Else",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
    assert_eq!(
        body["message"],
        "An account with email dup@example.com already exists"
    );
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let server = TestServer::start_with_config(ApiConfig {
        session_ttl: Duration::ZERO,
        ..ApiConfig::default()
    })
    .await;
    let token = server.signup("stale@example.com").await;

    let response = server.get("/auth/me").bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    // The session is gone; logging in again still works
    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "stale@example.com", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_me_logout_flow() {
    let server = TestServer::start().await;
    server.signup("flow@example.com").await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "Flow@Example.com", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let response = server.get("/auth/me").bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["user"]["email"], "flow@example.com");
    assert_eq!(me["user"]["name"], "Test Driver");

    let response = server
        .post("/auth/logout")
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.get("/auth/me").bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = TestServer::start().await;
    server.signup("known@example.com").await;

    let cases = [
        json!({ "email": "known@example.com", "password": "wrong-password" }),
        json!({ "email": "unknown@example.com", "password": "hunter2hunter2" }),
    ];
    let mut messages = Vec::new();
    for case in cases {
        let response = server.post("/auth/login").json(&case).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        messages.push(body["message"].clone());
    }
    // Same answer whether or not the account exists
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let server = TestServer::start().await;

    let response = server.get("/auth/me").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let response = server
        .get("/auth/me")
        .bearer_auth("0123456789abcdef0123456789abcdef")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/auth/me")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
