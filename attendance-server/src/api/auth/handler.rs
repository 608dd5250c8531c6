//! Auth API Handlers

use axum::body::Bytes;
use axum::extract::State;
use http::HeaderMap;
use shared::error::AppError;
use shared::models::{
    ChangePasswordRequest, RefreshResponse, RefreshTokenRequest, SigninRequest, SigninResponse,
    SignoutRequest, SignupRequest, SignupResponse,
};
use shared::response::ApiResponse;
use shared::util::now_millis;
use validator::Validate;

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ValidatedJson};
use crate::auth::CurrentUser;
use crate::services::{account, session};
use crate::state::AppState;
use crate::utils::validation::device_id_from_headers;

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let req = req.normalized();
    req.validate()?;
    let account = account::signup(&state, req, now_millis()).await?;
    Ok(ApiResponse::created("Signup successful", account))
}

/// POST /api/v1/auth/signin
pub async fn signin(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> ApiResult<SigninResponse> {
    let device_id = device_id_from_headers(&headers)?;
    let tokens = session::signin(&state, req, &device_id, now_millis()).await?;
    Ok(ApiResponse::ok("Login successful", tokens))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<RefreshResponse> {
    let device_id = device_id_from_headers(&headers)?;
    let tokens = session::refresh(&state, &req.refresh_token, &device_id, now_millis()).await?;
    Ok(ApiResponse::ok("Token refreshed", tokens))
}

/// POST /api/v1/auth/signout
///
/// The body is optional; an empty body falls back to the `X-Device-ID` session.
pub async fn signout(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ApiResponse<()>, AppError> {
    let req: SignoutRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SignoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };
    let device_id = device_id_from_headers(&headers).ok();

    session::signout(
        &state,
        &user,
        req.refresh_token.as_deref(),
        device_id.as_deref(),
        now_millis(),
    )
    .await?;
    Ok(ApiResponse::message("Signout successful"))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    session::change_password(&state, user.id, req, now_millis()).await?;
    Ok(ApiResponse::message("Password changed"))
}
