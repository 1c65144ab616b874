//! Common error types for VROOM storage

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a [`crate::VroomStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Vehicle not found (or not owned by the caller)
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Scan not found (or not owned by the caller)
    #[error("Scan not found: {0}")]
    ScanNotFound(String),

    /// Uniqueness constraint violated (email, VIN)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid input rejected by the store
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::UserNotFound(_) => 404,
            StoreError::VehicleNotFound(_) => 404,
            StoreError::ScanNotFound(_) => 404,
            StoreError::Conflict(_) => 409,
            StoreError::Invalid(_) => 400,
            StoreError::Internal(_) => 500,
        }
    }
}
