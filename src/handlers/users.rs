//! User creation and admin user management

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::handlers::response::{created, ok, ApiResponse, ApiResult};
use crate::middleware::Authenticated;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserFilter};
use crate::services::auth::Permission;
use crate::services::user::CreatedUser;
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;

pub async fn create_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedUser>>), FiveMGolfError> {
    let actor = auth.require(Permission::ManageUsers)?;
    created(state.services.user_service.create_user(request, actor).await?)
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Vec<User>> {
    auth.require(Permission::ManageUsers)?;
    ok(state.services.user_service.list_users(&filter).await?)
}

pub async fn get_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(uid): Path<String>,
) -> ApiResult<User> {
    auth.require(Permission::ManageUsers)?;
    ok(state.services.user_service.get_user(&uid).await?)
}

pub async fn update_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(uid): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let actor = auth.require(Permission::ManageUsers)?;
    ok(state.services.user_service.update_user(&uid, request, actor).await?)
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(uid): Path<String>,
) -> Result<StatusCode, FiveMGolfError> {
    let actor = auth.require(Permission::ManageUsers)?;
    state.services.user_service.delete_user(&uid, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
