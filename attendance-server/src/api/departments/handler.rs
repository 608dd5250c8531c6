//! Department API Handlers

use axum::extract::State;
use shared::error::AppError;
use shared::models::{
    AssignDepartmentRequest, CreateDepartmentRequest, DepartmentResponse,
    UpdateDepartmentRequest, UserResponse,
};
use shared::response::{ApiResponse, PageQuery};
use shared::util::now_millis;
use uuid::Uuid;
use validator::Validate;

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::{account, department};
use crate::state::AppState;

/// GET /api/v1/departments
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Vec<DepartmentResponse>> {
    let (departments, pagination) = department::list(&state, page).await?;
    Ok(ApiResponse::ok("Departments retrieved", departments).with_pagination(pagination))
}

/// GET /api/v1/departments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<DepartmentResponse> {
    let dept = department::get(&state, id).await?;
    Ok(ApiResponse::ok("Department retrieved", dept))
}

/// POST /api/v1/departments
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDepartmentRequest>,
) -> ApiResult<DepartmentResponse> {
    let req = req.normalized();
    req.validate()?;
    let dept = department::create(&state, req, now_millis()).await?;
    Ok(ApiResponse::created("Department created", dept))
}

/// PUT /api/v1/departments/{id}
///
/// Fields are trimmed and empty ones dropped before validating.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateDepartmentRequest>,
) -> ApiResult<DepartmentResponse> {
    let req = req.normalized();
    req.validate()?;
    let dept = department::update(&state, id, req, now_millis()).await?;
    Ok(ApiResponse::ok("Department updated", dept))
}

/// DELETE /api/v1/departments/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    department::delete(&state, id, now_millis()).await?;
    Ok(ApiResponse::message("Department deleted"))
}

/// POST /api/v1/departments/assignment
pub async fn assign(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AssignDepartmentRequest>,
) -> ApiResult<UserResponse> {
    let user = account::assign_department(&state, &req, now_millis()).await?;
    Ok(ApiResponse::ok("Department assigned", user))
}
