//! Root endpoint

use axum::Json;

/// Value served by `GET /`
pub const ROOT_VALUE: u32 = 10;

/// GET /
/// Constant liveness value for clients
pub async fn root() -> Json<u32> {
    Json(ROOT_VALUE)
}
