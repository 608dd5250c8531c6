//! Admin API Handlers

use axum::extract::State;
use shared::models::{DashboardQuery, DashboardResponse};
use shared::response::ApiResponse;
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::api::extract::ApiQuery;
use crate::services::reporting;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> ApiResult<DashboardResponse> {
    let dashboard = reporting::dashboard(&state, &query, now_millis()).await?;
    Ok(ApiResponse::ok("Dashboard retrieved", dashboard))
}
