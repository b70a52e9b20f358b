//! Translation tables for clients

use axum::extract::{Path, State};
use serde_json::Value;

use crate::handlers::response::{ok, ApiResult};
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;

pub async fn get_table(State(state): State<AppState>, Path(lang): Path<String>) -> ApiResult<Value> {
    let lang = lang.to_lowercase();
    if !state.i18n.is_language_supported(&lang) {
        return Err(FiveMGolfError::not_found("Language", lang));
    }
    let table = state
        .i18n
        .table(&lang)
        .ok_or_else(|| FiveMGolfError::not_found("Language", lang))?;
    ok(table)
}
