//! Department policy: CRUD over departments and their thresholds

use shared::error::{AppError, ErrorCode};
use shared::models::{CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest};
use shared::response::{PageQuery, Pagination};
use uuid::Uuid;

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::time::parse_time;

fn parse_threshold(field: &str, value: &str) -> ServiceResult<chrono::NaiveTime> {
    Ok(parse_time(value).map_err(|e| e.with_field(field, "must be HH:MM:SS"))?)
}

pub async fn create(
    state: &AppState,
    req: CreateDepartmentRequest,
    now: i64,
) -> ServiceResult<DepartmentResponse> {
    let req = req.normalized();
    let max_in = parse_threshold("max_clock_in_time", &req.max_clock_in_time)?;
    let max_out = parse_threshold("max_clock_out_time", &req.max_clock_out_time)?;

    let row = db::departments::insert(&state.pool, &req.name, max_in, max_out, now).await?;
    tracing::info!(department_id = %row.id, name = %row.name, "Department created");
    Ok(row.into())
}

pub async fn get(state: &AppState, id: Uuid) -> ServiceResult<DepartmentResponse> {
    db::departments::find(&state.pool, id)
        .await?
        .map(DepartmentResponse::from)
        .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound).into())
}

pub async fn list(
    state: &AppState,
    page: PageQuery,
) -> ServiceResult<(Vec<DepartmentResponse>, Pagination)> {
    let window = page.window()?;
    let total = db::departments::count(&state.pool).await?;
    let rows = db::departments::list(&state.pool, window.limit, window.offset()).await?;
    Ok((
        rows.into_iter().map(DepartmentResponse::from).collect(),
        window.pagination(total.max(0) as u64),
    ))
}

/// Partial update; empty fields keep their stored value
pub async fn update(
    state: &AppState,
    id: Uuid,
    req: UpdateDepartmentRequest,
    now: i64,
) -> ServiceResult<DepartmentResponse> {
    let req = req.normalized();
    let max_in = req
        .max_clock_in_time
        .as_deref()
        .map(|t| parse_threshold("max_clock_in_time", t))
        .transpose()?;
    let max_out = req
        .max_clock_out_time
        .as_deref()
        .map(|t| parse_threshold("max_clock_out_time", t))
        .transpose()?;

    let row = db::departments::update(
        &state.pool,
        id,
        req.name.as_deref(),
        max_in,
        max_out,
        now,
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound))?;

    tracing::info!(department_id = %id, "Department updated");
    Ok(row.into())
}

/// Soft delete and detach every member profile in the same transaction
pub async fn delete(state: &AppState, id: Uuid, now: i64) -> ServiceResult<()> {
    let mut tx = state.pool.begin().await?;
    if !db::departments::soft_delete(&mut *tx, id, now).await? {
        return Err(AppError::new(ErrorCode::DepartmentNotFound).into());
    }
    let detached = db::profiles::clear_department(&mut *tx, id, now).await?;
    tx.commit().await?;

    tracing::info!(department_id = %id, detached, "Department deleted");
    Ok(())
}
