//! E2E tests for the application shell: root, health and route mounting

mod common;

use common::TestServer;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_root_returns_ten() {
    let server = TestServer::start().await;

    let response = server.get("/").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, Value::from(10));
}

#[tokio::test]
async fn test_root_ignores_query_and_headers() {
    let server = TestServer::start().await;

    let requests = [
        server.get("/?foo=bar&limit=3"),
        server.get("/").header("X-Custom", "anything"),
        server.get("/").bearer_auth("not-a-real-token"),
        server.get("/").header("Accept", "text/plain"),
    ];
    for request in requests {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "10");
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;

    let response = server.get("/health").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_all_route_groups_are_mounted() {
    let server = TestServer::start().await;

    // Protected groups answer 401 rather than 404 when mounted
    for path in ["/auth/me", "/vehicles", "/scans"] {
        let response = server.get(path).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let response = server.get("/does-not-exist").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
