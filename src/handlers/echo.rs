//! Echo endpoint for connectivity checks

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::handlers::response::{ok, ApiResult};
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;

pub async fn echo(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    if !state.settings.features.test_endpoint {
        return Err(FiveMGolfError::not_found("Endpoint", "/api/test"));
    }
    ok(json!({ "received": body, "received_at": Utc::now() }))
}
