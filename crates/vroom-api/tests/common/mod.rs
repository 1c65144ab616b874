//! Test utilities for the VROOM API
//!
//! Runs the real router on an ephemeral port and talks to it over HTTP.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use vroom_api::{create_router, ApiConfig, AppState};

/// A test server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start a server over a fresh in-memory store
    pub async fn start() -> Self {
        Self::start_with_config(ApiConfig::default()).await
    }

    pub async fn start_with_config(config: ApiConfig) -> Self {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router = create_router(AppState::in_memory(config));

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Get the URL for a path on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Sign up a user and return the bearer token
    pub async fn signup(&self, email: &str) -> String {
        let response = self
            .post("/auth/signup")
            .json(&json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "Test Driver",
            }))
            .send()
            .await
            .expect("signup request failed");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("signup body");
        body["token"].as_str().expect("token").to_string()
    }

    /// Register a vehicle for the token's user and return its id
    pub async fn add_vehicle(&self, token: &str, make: &str) -> String {
        let response = self
            .post("/vehicles")
            .bearer_auth(token)
            .json(&json!({ "make": make, "model": "Model", "year": 2018 }))
            .send()
            .await
            .expect("create vehicle request failed");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("vehicle body");
        body["id"].as_str().expect("vehicle id").to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
