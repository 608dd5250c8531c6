//! Attendance API Handlers

use axum::extract::State;
use shared::models::{
    AttendanceHistoryResponse, AttendanceLogQuery, AttendanceLogResponse, AttendanceResponse,
    CurrentStatusResponse, HistoryQuery, StatusQuery,
};
use shared::response::ApiResponse;
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::api::extract::ApiQuery;
use crate::auth::CurrentUser;
use crate::services::{attendance, reporting};
use crate::state::AppState;

/// POST /api/v1/attendance/clock-in
pub async fn clock_in(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<AttendanceResponse> {
    let record = attendance::clock_in(&state, user.id, now_millis()).await?;
    Ok(ApiResponse::ok("Clock in successful", record))
}

/// PUT /api/v1/attendance/clock-out
pub async fn clock_out(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<AttendanceResponse> {
    let record = attendance::clock_out(&state, user.id, now_millis()).await?;
    Ok(ApiResponse::ok("Clock out successful", record))
}

/// GET /api/v1/attendance/logs
pub async fn logs(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<AttendanceLogQuery>,
) -> ApiResult<Vec<AttendanceLogResponse>> {
    let (logs, pagination) = reporting::attendance_logs(&state, &user, &query).await?;
    Ok(ApiResponse::ok("Attendance logs retrieved", logs).with_pagination(pagination))
}

/// GET /api/v1/attendance/history
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> ApiResult<Vec<AttendanceHistoryResponse>> {
    let (events, pagination) = reporting::attendance_history(&state, &user, &query).await?;
    Ok(ApiResponse::ok("Attendance history retrieved", events).with_pagination(pagination))
}

/// GET /api/v1/attendance/status
pub async fn status(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<CurrentStatusResponse> {
    let status = reporting::current_status(&state, &user, query.user_id, now_millis()).await?;
    Ok(ApiResponse::ok("Attendance status retrieved", status))
}
