//! HTTP request handlers for the VROOM API
//!
//! Each route group exposes a `router` function that [`crate::create_router`]
//! merges into the application.

pub mod auth;
pub mod root;
pub mod scans;
pub mod vehicles;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a resource id taken from the path or query string
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {} id: {}", kind, raw)))
}
