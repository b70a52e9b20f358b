//! Withdrawal endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::handlers::response::{created, ok, ApiResponse, ApiResult};
use crate::middleware::Authenticated;
use crate::models::{UpdateWithdrawalStatusRequest, Withdrawal, WithdrawalFilter, WithdrawalRequest};
use crate::services::auth::Permission;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;
use crate::utils::logging::log_admin_action;

pub async fn list_withdrawals(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(filter): Query<WithdrawalFilter>,
) -> ApiResult<Vec<Withdrawal>> {
    auth.require(Permission::ManageWithdrawals)?;
    ok(state.services.withdrawal_service.list(&filter).await?)
}

pub async fn create_withdrawal(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Withdrawal>>), FiveMGolfError> {
    let actor = auth.require(Permission::ManageWithdrawals)?;
    let withdrawal = state.services.withdrawal_service.create(request, &actor.uid).await?;
    log_admin_action(&actor.uid, "create_withdrawal", Some(withdrawal.id.as_str()), None);
    created(withdrawal)
}

pub async fn get_withdrawal(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Withdrawal> {
    auth.require(Permission::ManageWithdrawals)?;
    ok(state.services.withdrawal_service.get(&id).await?)
}

pub async fn update_withdrawal(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(request): Json<WithdrawalRequest>,
) -> ApiResult<Withdrawal> {
    let actor = auth.require(Permission::ManageWithdrawals)?;
    let withdrawal = state.services.withdrawal_service.update(&id, request).await?;
    log_admin_action(&actor.uid, "update_withdrawal", Some(id.as_str()), None);
    ok(withdrawal)
}

pub async fn update_withdrawal_status(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateWithdrawalStatusRequest>,
) -> ApiResult<Withdrawal> {
    let actor = auth.require(Permission::ManageWithdrawals)?;
    let withdrawal = state.services.withdrawal_service.set_status(&id, request.status).await?;
    log_admin_action(
        &actor.uid,
        "set_withdrawal_status",
        Some(id.as_str()),
        Some(format!("{:?}", request.status).as_str()),
    );
    ok(withdrawal)
}

pub async fn delete_withdrawal(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, FiveMGolfError> {
    let actor = auth.require(Permission::ManageWithdrawals)?;
    state.services.withdrawal_service.delete(&id).await?;
    log_admin_action(&actor.uid, "delete_withdrawal", Some(id.as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}
