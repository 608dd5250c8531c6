//! User administration API Handlers

use axum::extract::State;
use shared::models::{ChangeRoleRequest, UserListQuery, UserResponse};
use shared::response::ApiResponse;
use shared::util::now_millis;
use uuid::Uuid;

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::account;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> ApiResult<Vec<UserResponse>> {
    let (users, pagination) = account::list_users(&state, &query).await?;
    Ok(ApiResponse::ok("Users retrieved", users).with_pagination(pagination))
}

/// PUT /api/v1/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ChangeRoleRequest>,
) -> ApiResult<UserResponse> {
    let user = account::change_role(&state, id, req.role, now_millis()).await?;
    Ok(ApiResponse::ok("Role updated", user))
}
