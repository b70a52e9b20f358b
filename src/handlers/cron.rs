//! Scheduled deposit sync

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::Utc;
use tracing::info;

use crate::handlers::response::{ok, ApiResult};
use crate::services::DepositSyncReport;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;

/// Pull recent bank transactions into deposits; requires the cron secret
pub async fn deposit_sync(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<DepositSyncReport> {
    let authorization = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
    state.services.auth_service.verify_cron_secret(authorization)?;

    if !state.settings.features.deposit_sync {
        return Err(FiveMGolfError::ServiceUnavailable("Deposit sync is disabled".to_string()));
    }

    let report = state.services.deposit_service.sync_from_bank(Utc::now()).await?;
    info!(inserted = report.inserted, duplicates = report.duplicates, "Deposit sync finished");
    ok(report)
}
