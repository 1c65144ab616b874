//! Account handlers: signup, login, logout and profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vroom_core::{is_plausible_email, normalize_email, NewUser, User};

use crate::auth::{require_session, CurrentUser};
use crate::error::ApiError;
use crate::password::{self, DUMMY_HASH};
use crate::session::Session;
use crate::state::AppState;

/// Routes under `/auth`. Only `me` and `logout` require a session.
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .merge(protected)
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthResponse {
    fn new(user: User, session: Session) -> Self {
        Self {
            user,
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

/// POST /auth/signup
/// Register an account and open a session for it
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = normalize_email(&request.email);
    if !is_plausible_email(&email) {
        return Err(ApiError::BadRequest(format!("Invalid email address: {}", email)));
    }
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    let min_length = state.config().min_password_length;
    if request.password.chars().count() < min_length {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters",
            min_length
        )));
    }

    // Hashing is slow; reject a taken email before paying for it.
    // create_user still enforces uniqueness against concurrent signups.
    if state
        .store()
        .user_credentials_by_email(&email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "An account with email {} already exists",
            email
        )));
    }

    let password_hash = password::hash_password(request.password).await?;
    let user = state
        .store()
        .create_user(NewUser {
            email,
            name: name.to_string(),
            password_hash,
        })
        .await?;
    let session = state.sessions().create(user.id);

    tracing::info!(user_id = %user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, session))))
}

/// POST /auth/login
/// Exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = state
        .store()
        .user_credentials_by_email(&request.email)
        .await?;

    // Always run a verification so unknown emails cost the same as bad passwords
    let (user, expected_hash) = match credentials {
        Some(c) => (Some(c.user), c.password_hash),
        None => (None, DUMMY_HASH.to_string()),
    };
    let valid = password::verify_password(request.password, expected_hash).await?;

    match user {
        Some(user) if valid => {
            let session = state.sessions().create(user.id);
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Json(AuthResponse::new(user, session)))
        }
        _ => {
            tracing::debug!("Rejected login attempt");
            Err(ApiError::Unauthorized("Invalid email or password".to_string()))
        }
    }
}

/// GET /auth/me
/// Profile of the authenticated user
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse { user: current.user })
}

/// POST /auth/logout
/// Revoke the token the request was made with
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> StatusCode {
    state.sessions().revoke(&current.token);
    tracing::info!(user_id = %current.user.id, "User logged out");
    StatusCode::NO_CONTENT
}
