//! Vehicle handlers
//!
//! All routes require a session and only ever see the caller's vehicles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;
use vroom_core::{NewVehicle, Vehicle, VehicleUpdate};

use super::parse_id;
use crate::auth::{require_session, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/{vehicle_id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

#[derive(Serialize)]
pub struct VehiclesResponse {
    pub items: Vec<Vehicle>,
}

/// GET /vehicles
/// List the caller's vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<VehiclesResponse>, ApiError> {
    let items = state.store().list_vehicles(current.user.id).await?;
    Ok(Json(VehiclesResponse { items }))
}

/// POST /vehicles
/// Register a vehicle
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<NewVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let new = request.normalize()?;
    let vehicle = state.store().create_vehicle(current.user.id, new).await?;

    tracing::info!(
        user_id = %current.user.id,
        vehicle_id = %vehicle.id,
        "Vehicle registered"
    );
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// GET /vehicles/{vehicle_id}
pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    let vehicle_id = parse_id("vehicle", &vehicle_id)?;
    let vehicle = state.store().get_vehicle(current.user.id, vehicle_id).await?;
    Ok(Json(vehicle))
}

/// PUT /vehicles/{vehicle_id}
/// Update any subset of a vehicle's fields
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(vehicle_id): Path<String>,
    Json(request): Json<VehicleUpdate>,
) -> Result<Json<Vehicle>, ApiError> {
    let vehicle_id = parse_id("vehicle", &vehicle_id)?;
    let update = request.normalize()?;
    let vehicle = state
        .store()
        .update_vehicle(current.user.id, vehicle_id, update)
        .await?;
    Ok(Json(vehicle))
}

/// DELETE /vehicles/{vehicle_id}
/// Remove a vehicle together with its scans
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(vehicle_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let vehicle_id = parse_id("vehicle", &vehicle_id)?;
    state
        .store()
        .delete_vehicle(current.user.id, vehicle_id)
        .await?;

    tracing::info!(user_id = %current.user.id, %vehicle_id, "Vehicle deleted");
    Ok(StatusCode::NO_CONTENT)
}
