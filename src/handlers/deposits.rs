//! Deposit endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::handlers::response::{created, ok, ApiResponse, ApiResult};
use crate::middleware::Authenticated;
use crate::models::{Deposit, DepositFilter, DepositRequest, UpdateDepositStatusRequest};
use crate::services::auth::Permission;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;
use crate::utils::logging::log_admin_action;

pub async fn list_deposits(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(filter): Query<DepositFilter>,
) -> ApiResult<Vec<Deposit>> {
    auth.require(Permission::ManageDeposits)?;
    ok(state.services.deposit_service.list(&filter).await?)
}

/// Record a deposit that did not come through the bank feed
pub async fn create_deposit(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Deposit>>), FiveMGolfError> {
    let actor = auth.require(Permission::ManageDeposits)?;
    let deposit = state.services.deposit_service.create_manual(request).await?;
    log_admin_action(&actor.uid, "create_deposit", Some(deposit.id.as_str()), None);
    created(deposit)
}

pub async fn update_deposit_status(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateDepositStatusRequest>,
) -> ApiResult<Deposit> {
    let actor = auth.require(Permission::ManageDeposits)?;
    let deposit = state.services.deposit_service.update_status(&id, request.status).await?;
    log_admin_action(
        &actor.uid,
        "set_deposit_status",
        Some(id.as_str()),
        Some(format!("{:?}", request.status).as_str()),
    );
    ok(deposit)
}
