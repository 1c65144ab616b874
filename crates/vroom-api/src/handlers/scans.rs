//! Scan handlers
//!
//! A scan is a batch of raw ELM327 responses uploaded by the mobile client
//! for one vehicle. The responses are decoded here, before storage.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use vroom_core::obd::ScanReport;
use vroom_core::{NewScan, Scan, ScanSummary};

use super::parse_id;
use crate::auth::{require_session, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/scans", get(list_scans).post(create_scan))
        .route("/scans/{scan_id}", get(get_scan).delete(delete_scan))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

#[derive(Debug, Deserialize)]
pub struct CreateScanRequest {
    pub vehicle_id: String,
    /// Raw adapter responses, one per request sent to the vehicle
    pub responses: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanListQuery {
    #[serde(default)]
    pub vehicle_id: Option<String>,
}

#[derive(Serialize)]
pub struct ScansResponse {
    pub items: Vec<ScanSummary>,
}

/// POST /scans
/// Decode and store a batch of adapter responses
pub async fn create_scan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateScanRequest>,
) -> Result<(StatusCode, Json<Scan>), ApiError> {
    let vehicle_id = parse_id("vehicle", &request.vehicle_id)?;
    let limit = state.config().max_scan_responses;
    if request.responses.is_empty() {
        return Err(ApiError::BadRequest(
            "responses must contain at least one entry".to_string(),
        ));
    }
    if request.responses.len() > limit {
        return Err(ApiError::BadRequest(format!(
            "responses must contain at most {} entries, got {}",
            limit,
            request.responses.len()
        )));
    }

    let report = ScanReport::from_responses(&request.responses);
    let notes = request
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let scan = state
        .store()
        .create_scan(
            current.user.id,
            NewScan {
                vehicle_id,
                notes,
                report,
            },
        )
        .await?;

    tracing::info!(
        user_id = %current.user.id,
        %vehicle_id,
        scan_id = %scan.id,
        readings = scan.readings.len(),
        trouble_codes = scan.trouble_codes.len(),
        "Scan stored"
    );
    Ok((StatusCode::CREATED, Json(scan)))
}

/// GET /scans?vehicle_id=...
/// List the caller's scans, newest first
pub async fn list_scans(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ScanListQuery>,
) -> Result<Json<ScansResponse>, ApiError> {
    let vehicle_id = query
        .vehicle_id
        .as_deref()
        .map(|id| parse_id("vehicle", id))
        .transpose()?;
    let scans = state.store().list_scans(current.user.id, vehicle_id).await?;
    Ok(Json(ScansResponse {
        items: scans.iter().map(Scan::summary).collect(),
    }))
}

/// GET /scans/{scan_id}
pub async fn get_scan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(scan_id): Path<String>,
) -> Result<Json<Scan>, ApiError> {
    let scan_id = parse_id("scan", &scan_id)?;
    let scan = state.store().get_scan(current.user.id, scan_id).await?;
    Ok(Json(scan))
}

/// DELETE /scans/{scan_id}
pub async fn delete_scan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(scan_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let scan_id = parse_id("scan", &scan_id)?;
    state.store().delete_scan(current.user.id, scan_id).await?;

    tracing::info!(user_id = %current.user.id, %scan_id, "Scan deleted");
    Ok(StatusCode::NO_CONTENT)
}
