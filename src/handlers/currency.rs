//! Exchange-rate proxy endpoint

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::handlers::response::{ok, ApiResult};
use crate::services::CurrencyRate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RateQuery {
    pub base: String,
    pub target: String,
}

pub async fn get_rate(State(state): State<AppState>, Query(query): Query<RateQuery>) -> ApiResult<CurrencyRate> {
    ok(state
        .services
        .currency_service
        .get_rate(&query.base, &query.target)
        .await?)
}
