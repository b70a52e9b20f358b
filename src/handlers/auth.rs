//! Login endpoint

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::handlers::response::{ok, ApiResult};
use crate::services::auth::LoginResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let response = state
        .services
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    ok(response)
}
