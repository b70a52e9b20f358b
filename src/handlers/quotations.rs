//! Quotation endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::handlers::response::{created, ok, ApiResponse, ApiResult};
use crate::middleware::Authenticated;
use crate::models::{Quotation, QuotationDraft, QuotationFilter, UpdateQuotationStatusRequest};
use crate::services::auth::Permission;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;
use crate::utils::logging::log_admin_action;

pub async fn list_quotations(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(filter): Query<QuotationFilter>,
) -> ApiResult<Vec<Quotation>> {
    auth.require(Permission::ManageQuotations)?;
    ok(state.services.quotation_service.list(&filter).await?)
}

pub async fn create_quotation(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(draft): Json<QuotationDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Quotation>>), FiveMGolfError> {
    let actor = auth.require(Permission::ManageQuotations)?;
    let quotation = state.services.quotation_service.create(draft, &actor.uid).await?;
    log_admin_action(&actor.uid, "create_quotation", Some(quotation.id.as_str()), None);
    created(quotation)
}

pub async fn get_quotation(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Quotation> {
    auth.require(Permission::ManageQuotations)?;
    ok(state.services.quotation_service.get(&id).await?)
}

pub async fn update_quotation(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(draft): Json<QuotationDraft>,
) -> ApiResult<Quotation> {
    let actor = auth.require(Permission::ManageQuotations)?;
    let quotation = state.services.quotation_service.update(&id, draft).await?;
    log_admin_action(&actor.uid, "update_quotation", Some(id.as_str()), None);
    ok(quotation)
}

pub async fn update_quotation_status(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(request): Json<UpdateQuotationStatusRequest>,
) -> ApiResult<Quotation> {
    let actor = auth.require(Permission::ManageQuotations)?;
    let quotation = state.services.quotation_service.set_status(&id, request.status).await?;
    log_admin_action(
        &actor.uid,
        "set_quotation_status",
        Some(id.as_str()),
        Some(request.status.to_string().as_str()),
    );
    ok(quotation)
}

pub async fn delete_quotation(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, FiveMGolfError> {
    let actor = auth.require(Permission::ManageQuotations)?;
    state.services.quotation_service.delete(&id).await?;
    log_admin_action(&actor.uid, "delete_quotation", Some(id.as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}
