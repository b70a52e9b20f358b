//! Health endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let status = state.services.health_check(&state.database).await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": if status.is_healthy() { "ok" } else { "degraded" },
            "version": crate::VERSION,
            "checks": status,
            "issues": status.get_issues(),
        })),
    )
}
