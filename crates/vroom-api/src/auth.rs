//! Bearer token authentication middleware
//!
//! Validates `Authorization: Bearer <token>` on the routes it is layered
//! onto and stores the resolved [`CurrentUser`] in the request extensions.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use vroom_core::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller of an authenticated request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// The bearer token the request was made with
    pub token: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Axum middleware function that requires a live session.
///
/// Returns 401 if the token is missing, unknown or expired, or if the
/// session's user no longer exists.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        tracing::debug!(
            path = %request.uri().path(),
            "Missing or malformed Authorization header"
        );
        return Err(ApiError::Unauthorized(
            "Missing or malformed Authorization header".to_string(),
        ));
    };

    let session = state
        .sessions()
        .resolve(&token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = state
        .store()
        .get_user(session.user_id)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert(CurrentUser { user, token });
    Ok(next.run(request).await)
}
