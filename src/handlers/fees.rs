//! Fee calculator endpoint

use axum::extract::State;
use axum::Json;

use crate::handlers::response::{ok, ApiResult};
use crate::services::{FeeBreakdown, FeeInput};
use crate::state::AppState;

pub async fn calculate(State(state): State<AppState>, Json(input): Json<FeeInput>) -> ApiResult<FeeBreakdown> {
    ok(state.services.fee_calculator.calculate(&input))
}
