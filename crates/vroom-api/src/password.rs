//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings, which carry the salt and parameters.
//! Hashing is CPU-bound, so both entry points run on the blocking pool.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::error::ApiError;

/// Compared against when the email is unknown, so that a login attempt
/// costs the same whether or not the account exists.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

fn hasher() -> Result<Argon2<'static>, ApiError> {
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| ApiError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn compute_hash(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn check_hash(password: &str, expected: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(expected)
        .map_err(|e| ApiError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hash a password into a PHC string
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || compute_hash(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Check a password against a PHC string
pub async fn verify_password(password: String, expected: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || check_hash(&password, &expected))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("battery staple".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("same".to_string()).await.unwrap();
        let b = hash_password("same".to_string()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_dummy_hash_never_matches() {
        assert!(!verify_password("password".to_string(), DUMMY_HASH.to_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_internal_error() {
        let result = verify_password("x".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
