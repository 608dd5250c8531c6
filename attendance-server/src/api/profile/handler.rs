//! Profile API Handlers

use axum::extract::State;
use shared::models::{UpdateProfileRequest, UserResponse};
use shared::response::ApiResponse;
use shared::util::now_millis;
use validator::Validate;

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::CurrentUser;
use crate::services::account;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get(State(state): State<AppState>, user: CurrentUser) -> ApiResult<UserResponse> {
    let profile = account::get_profile(&state, user.id).await?;
    Ok(ApiResponse::ok("Profile retrieved", profile))
}

/// PUT /api/v1/profile
///
/// Empty strings mean "unchanged", so they are dropped before validating.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<UserResponse> {
    let req = req.normalized();
    req.validate()?;
    let profile = account::update_profile(&state, user.id, req, now_millis()).await?;
    Ok(ApiResponse::ok("Profile updated", profile))
}
