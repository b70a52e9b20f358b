//! Location reference data endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::handlers::response::{created, ok, ApiResponse, ApiResult};
use crate::middleware::Authenticated;
use crate::models::{Location, LocationRequest};
use crate::services::auth::Permission;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;
use crate::utils::logging::log_admin_action;

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub active_only: bool,
}

pub async fn list_locations(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Vec<Location>> {
    auth.require(Permission::ManageLocations)?;
    ok(state.services.location_service.list(query.active_only).await?)
}

pub async fn create_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<LocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Location>>), FiveMGolfError> {
    let actor = auth.require(Permission::ManageLocations)?;
    let location = state.services.location_service.create(request).await?;
    log_admin_action(&actor.uid, "create_location", Some(location.id.as_str()), None);
    created(location)
}

pub async fn update_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(request): Json<LocationRequest>,
) -> ApiResult<Location> {
    let actor = auth.require(Permission::ManageLocations)?;
    let location = state.services.location_service.update(&id, request).await?;
    log_admin_action(&actor.uid, "update_location", Some(id.as_str()), None);
    ok(location)
}

pub async fn delete_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, FiveMGolfError> {
    let actor = auth.require(Permission::ManageLocations)?;
    state.services.location_service.delete(&id).await?;
    log_admin_action(&actor.uid, "delete_location", Some(id.as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}
