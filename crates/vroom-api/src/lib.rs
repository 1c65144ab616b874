//! vroom-api - VROOM REST API layer
//!
//! This crate assembles the HTTP application: a constant root endpoint,
//! a health check, and the `auth`, `vehicles` and `scans` routers. All
//! storage goes through the [`vroom_core::VroomStore`] trait held in
//! [`AppState`].
//!
//! # Usage
//!
//! ```ignore
//! use vroom_api::{create_router, ApiConfig, AppState};
//!
//! let state = AppState::in_memory(ApiConfig::default());
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod password;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use session::{Session, SessionManager};
pub use state::{ApiConfig, AppState};

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the VROOM REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root::root))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .merge(handlers::auth::router(&state))
        .merge(handlers::vehicles::router(&state))
        .merge(handlers::scans::router(&state))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
