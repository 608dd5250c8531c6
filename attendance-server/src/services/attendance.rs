//! Attendance engine
//!
//! Per (employee, local day) the record moves Not Clocked → Clocked In →
//! Clocked Out. The unique `attendance_id` index linearizes concurrent
//! clock-ins; each transition writes its record and history event in one
//! transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::{AttendanceResponse, AttendanceType};
use uuid::Uuid;

use crate::db::{self, profiles::ProfileRow};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::time::{attendance_id, local_date};

pub const CLOCK_IN_DESCRIPTION: &str = "Clock in";
pub const CLOCK_OUT_DESCRIPTION: &str = "Clock out";

async fn load_profile(state: &AppState, user_id: Uuid) -> ServiceResult<ProfileRow> {
    Ok(db::profiles::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?)
}

/// Today's attendance id for `employee_code` in the business time zone
pub fn todays_attendance_id(state: &AppState, employee_code: &str, now: i64) -> String {
    attendance_id(employee_code, local_date(now, state.tz()))
}

pub async fn clock_in(
    state: &AppState,
    user_id: Uuid,
    now: i64,
) -> ServiceResult<AttendanceResponse> {
    let profile = load_profile(state, user_id).await?;
    if profile.department_id.is_none() {
        return Err(AppError::new(ErrorCode::NoDepartment).into());
    }

    let attendance_id = todays_attendance_id(state, &profile.employee_code, now);
    if db::attendances::find_by_attendance_id(&state.pool, &attendance_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AlreadyClockedIn).into());
    }

    // A concurrent clock-in that got past the lookup fails here on the
    // unique index and surfaces as AlreadyClockedIn.
    let mut tx = state.pool.begin().await?;
    let row =
        db::attendances::insert_clock_in(&mut *tx, &profile.employee_code, &attendance_id, now)
            .await?;
    db::attendances::insert_history(
        &mut *tx,
        &profile.employee_code,
        &attendance_id,
        AttendanceType::In,
        CLOCK_IN_DESCRIPTION,
        now,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        employee_code = %profile.employee_code,
        attendance_id = %attendance_id,
        "Clocked in"
    );
    Ok(row.into())
}

pub async fn clock_out(
    state: &AppState,
    user_id: Uuid,
    now: i64,
) -> ServiceResult<AttendanceResponse> {
    let profile = load_profile(state, user_id).await?;
    let attendance_id = todays_attendance_id(state, &profile.employee_code, now);

    let existing = db::attendances::find_by_attendance_id(&state.pool, &attendance_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NoClockInToday))?;
    if existing.clock_out.is_some() {
        return Err(AppError::new(ErrorCode::AlreadyClockedOut).into());
    }

    let mut tx = state.pool.begin().await?;
    let row = db::attendances::set_clock_out(&mut *tx, &attendance_id, now)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AlreadyClockedOut))?;
    db::attendances::insert_history(
        &mut *tx,
        &profile.employee_code,
        &attendance_id,
        AttendanceType::Out,
        CLOCK_OUT_DESCRIPTION,
        now,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        employee_code = %profile.employee_code,
        attendance_id = %attendance_id,
        "Clocked out"
    );
    Ok(row.into())
}
