//! Reporting and read-side authorization
//!
//! Punctuality is derived here rather than in SQL: the threshold is a time of
//! day, and it is anchored to the local date of the clock event in the
//! business time zone before comparing.

use std::collections::BTreeMap;

use chrono::{Days, NaiveTime};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AttendanceHistoryResponse, AttendanceLogQuery, AttendanceLogResponse, AttendanceStatus,
    CurrentStatusResponse, DashboardQuery, DashboardResponse, HistoryQuery, Punctuality,
};
use shared::response::Pagination;
use uuid::Uuid;

use crate::auth::jwt::CurrentUser;
use crate::db::{self, attendances::LogFilter, attendances::LogRow};
use crate::error::ServiceResult;
use crate::security_log;
use crate::services::attendance::todays_attendance_id;
use crate::state::AppState;
use crate::utils::time::{
    date_time_millis, day_end_millis, day_start_millis, format_date, local_date, parse_date_field,
};

/// Dashboard window when the caller gives no start date
pub const DEFAULT_DASHBOARD_DAYS: u64 = 30;

/// Unix millis of `threshold` on the local day of `instant`
fn threshold_on_day_of(instant: i64, threshold: NaiveTime, tz: Tz) -> i64 {
    date_time_millis(local_date(instant, tz), threshold, tz)
}

fn misconfigured() -> AppError {
    AppError::new(ErrorCode::DepartmentMisconfigured)
}

/// `Late` strictly after the threshold, otherwise `On Time`
pub fn clock_in_punctuality(
    clock_in: Option<i64>,
    max_clock_in: Option<NaiveTime>,
    tz: Tz,
) -> AppResult<Punctuality> {
    let Some(clock_in) = clock_in else {
        return Ok(Punctuality::NotApplicable);
    };
    let threshold = max_clock_in.ok_or_else(misconfigured)?;
    if clock_in > threshold_on_day_of(clock_in, threshold, tz) {
        Ok(Punctuality::Late)
    } else {
        Ok(Punctuality::OnTime)
    }
}

/// `Early Leave` strictly before the threshold, otherwise `On Time`
pub fn clock_out_punctuality(
    clock_out: Option<i64>,
    max_clock_out: Option<NaiveTime>,
    tz: Tz,
) -> AppResult<Punctuality> {
    let Some(clock_out) = clock_out else {
        return Ok(Punctuality::NotApplicable);
    };
    let threshold = max_clock_out.ok_or_else(misconfigured)?;
    if clock_out < threshold_on_day_of(clock_out, threshold, tz) {
        Ok(Punctuality::EarlyLeave)
    } else {
        Ok(Punctuality::OnTime)
    }
}

/// Attach punctuality to a log row. Employees without a department have
/// nothing to be measured against.
pub fn log_view(row: LogRow, tz: Tz) -> AppResult<AttendanceLogResponse> {
    let (in_punctuality, out_punctuality) = if row.department_id.is_some() {
        (
            clock_in_punctuality(row.clock_in, row.max_clock_in_time, tz)?,
            clock_out_punctuality(row.clock_out, row.max_clock_out_time, tz)?,
        )
    } else {
        (Punctuality::NotApplicable, Punctuality::NotApplicable)
    };

    Ok(AttendanceLogResponse {
        attendance_id: row.attendance_id,
        employee_code: row.employee_code,
        full_name: row.full_name,
        department_name: row.department_name,
        clock_in: row.clock_in,
        clock_out: row.clock_out,
        in_punctuality,
        out_punctuality,
    })
}

/// Department scope for a log read: admins see what they ask for, everyone
/// else is pinned to their own department.
async fn log_scope(
    state: &AppState,
    principal: &CurrentUser,
    requested: Option<Uuid>,
) -> ServiceResult<Option<Uuid>> {
    if principal.is_admin() {
        return Ok(requested);
    }
    let own = db::profiles::find_by_user(&state.pool, principal.id)
        .await?
        .and_then(|p| p.department_id);
    match own {
        Some(department_id) => Ok(Some(department_id)),
        None => {
            security_log!(
                "WARN",
                "logs_denied",
                user_id = principal.id.to_string()
            );
            Err(AppError::new(ErrorCode::NoDepartmentAccess).into())
        }
    }
}

pub async fn attendance_logs(
    state: &AppState,
    principal: &CurrentUser,
    query: &AttendanceLogQuery,
) -> ServiceResult<(Vec<AttendanceLogResponse>, Pagination)> {
    let window = query.page_query().window()?;
    let tz = state.tz();

    let day = query
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| parse_date_field("date", d))
        .transpose()?
        .map(|date| (day_start_millis(date, tz), day_end_millis(date, tz)));
    let department_id = log_scope(state, principal, query.department_id).await?;

    let filter = LogFilter { day, department_id };
    let (rows, total) =
        db::attendances::list_logs(&state.pool, &filter, window.limit, window.offset()).await?;

    let logs = rows
        .into_iter()
        .map(|row| log_view(row, tz))
        .collect::<AppResult<Vec<_>>>()?;
    Ok((logs, window.pagination(total)))
}

/// Only the subject themself or an admin may read a user's attendance
fn ensure_can_read(principal: &CurrentUser, target: Uuid) -> AppResult<()> {
    if principal.id == target || principal.is_admin() {
        return Ok(());
    }
    security_log!(
        "WARN",
        "attendance_read_denied",
        user_id = principal.id.to_string(),
        target = target.to_string()
    );
    Err(AppError::forbidden("Cannot read another user's attendance"))
}

pub async fn attendance_history(
    state: &AppState,
    principal: &CurrentUser,
    query: &HistoryQuery,
) -> ServiceResult<(Vec<AttendanceHistoryResponse>, Pagination)> {
    ensure_can_read(principal, query.user_id)?;
    let window = query.page_query().window()?;

    let profile = db::profiles::find_by_user(&state.pool, query.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;
    let (rows, total) = db::attendances::list_history(
        &state.pool,
        &profile.employee_code,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        rows.into_iter()
            .map(AttendanceHistoryResponse::from)
            .collect(),
        window.pagination(total),
    ))
}

pub fn status_of(clock_in: Option<i64>, clock_out: Option<i64>) -> AttendanceStatus {
    match (clock_in, clock_out) {
        (_, Some(_)) => AttendanceStatus::ClockedOut,
        (Some(_), None) => AttendanceStatus::ClockedIn,
        (None, None) => AttendanceStatus::NotClocked,
    }
}

/// Today's state for `target`, defaulting to the caller
pub async fn current_status(
    state: &AppState,
    principal: &CurrentUser,
    target: Option<Uuid>,
    now: i64,
) -> ServiceResult<CurrentStatusResponse> {
    let target = target.unwrap_or(principal.id);
    ensure_can_read(principal, target)?;

    let view = db::profiles::find_view(&state.pool, target)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;
    let attendance_id = todays_attendance_id(state, &view.employee_code, now);
    let today = db::attendances::find_by_attendance_id(&state.pool, &attendance_id).await?;

    let (clock_in, clock_out, updated_at) = match &today {
        Some(row) => (row.clock_in, row.clock_out, Some(row.updated_at)),
        None => (None, None, None),
    };

    Ok(CurrentStatusResponse {
        user_id: target,
        employee_code: view.employee_code,
        full_name: view.full_name,
        department: view.dept_name,
        status: status_of(clock_in, clock_out),
        clock_in,
        clock_out,
        updated_at,
    })
}

pub async fn dashboard(
    state: &AppState,
    query: &DashboardQuery,
    now: i64,
) -> ServiceResult<DashboardResponse> {
    let tz = state.tz();
    let today = local_date(now, tz);

    let end = query
        .end_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| parse_date_field("end_date", d))
        .transpose()?
        .unwrap_or(today);
    let start = match query.start_date.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => parse_date_field("start_date", d)?,
        None => end
            .checked_sub_days(Days::new(DEFAULT_DASHBOARD_DAYS - 1))
            .unwrap_or(end),
    };
    if start > end {
        return Err(AppError::validation("start_date must not be after end_date")
            .with_field("start_date", "must not be after end_date")
            .into());
    }

    let mut per_department = BTreeMap::new();
    for (name, count) in db::profiles::count_per_department(&state.pool).await? {
        *per_department.entry(name).or_insert(0) += count;
    }
    let updated = db::departments::count_updated_between(
        &state.pool,
        day_start_millis(start, tz),
        day_end_millis(end, tz),
    )
    .await?;
    let registrations = db::profiles::count_created_between(
        &state.pool,
        day_start_millis(today, tz),
        day_end_millis(today, tz),
    )
    .await?;

    Ok(DashboardResponse {
        total_employees_per_dept: per_department,
        total_updated_depts: updated,
        total_today_registrations: registrations,
        start_date: format_date(start),
        end_date: format_date(end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::models::Role;

    const JAKARTA: Tz = chrono_tz::Asia::Jakarta;

    fn at(h: u32, m: u32) -> i64 {
        JAKARTA
            .with_ymd_and_hms(2025, 9, 15, h, m, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn hms(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn row(clock_in: Option<i64>, clock_out: Option<i64>) -> LogRow {
        LogRow {
            attendance_id: "EMP-1-2025-09-15".into(),
            employee_code: "EMP-1".into(),
            full_name: "Alice".into(),
            department_id: Some(Uuid::nil()),
            department_name: "Engineering".into(),
            clock_in,
            clock_out,
            max_clock_in_time: hms(9, 0),
            max_clock_out_time: hms(17, 0),
        }
    }

    #[test]
    fn test_clock_in_on_time_and_late() {
        assert_eq!(
            clock_in_punctuality(Some(at(8, 55)), hms(9, 0), JAKARTA).unwrap(),
            Punctuality::OnTime
        );
        assert_eq!(
            clock_in_punctuality(Some(at(9, 0)), hms(9, 0), JAKARTA).unwrap(),
            Punctuality::OnTime
        );
        assert_eq!(
            clock_in_punctuality(Some(at(9, 15)), hms(9, 0), JAKARTA).unwrap(),
            Punctuality::Late
        );
    }

    #[test]
    fn test_clock_out_early_leave() {
        assert_eq!(
            clock_out_punctuality(Some(at(16, 59)), hms(17, 0), JAKARTA).unwrap(),
            Punctuality::EarlyLeave
        );
        assert_eq!(
            clock_out_punctuality(Some(at(17, 30)), hms(17, 0), JAKARTA).unwrap(),
            Punctuality::OnTime
        );
    }

    #[test]
    fn test_missing_clock_is_not_applicable() {
        assert_eq!(
            clock_in_punctuality(None, None, JAKARTA).unwrap(),
            Punctuality::NotApplicable
        );
        assert_eq!(
            clock_out_punctuality(None, hms(17, 0), JAKARTA).unwrap(),
            Punctuality::NotApplicable
        );
    }

    #[test]
    fn test_missing_threshold_is_misconfigured() {
        let err = clock_in_punctuality(Some(at(8, 0)), None, JAKARTA).unwrap_err();
        assert_eq!(err.code, ErrorCode::DepartmentMisconfigured);

        let mut r = row(Some(at(8, 0)), None);
        r.max_clock_in_time = None;
        assert!(log_view(r, JAKARTA).is_err());
    }

    #[test]
    fn test_threshold_uses_local_day_not_utc_day() {
        // 06:30 Jakarta is 23:30 UTC on the previous day
        assert_eq!(
            clock_in_punctuality(Some(at(6, 30)), hms(7, 0), JAKARTA).unwrap(),
            Punctuality::OnTime
        );
        assert_eq!(
            clock_in_punctuality(Some(at(7, 1)), hms(7, 0), JAKARTA).unwrap(),
            Punctuality::Late
        );
    }

    #[test]
    fn test_log_view_full_day() {
        let view = log_view(row(Some(at(8, 55)), Some(at(17, 30))), JAKARTA).unwrap();
        assert_eq!(view.in_punctuality, Punctuality::OnTime);
        assert_eq!(view.out_punctuality, Punctuality::OnTime);
    }

    #[test]
    fn test_log_view_without_department() {
        let mut r = row(Some(at(10, 0)), None);
        r.department_id = None;
        r.max_clock_in_time = None;
        r.max_clock_out_time = None;
        let view = log_view(r, JAKARTA).unwrap();
        assert_eq!(view.in_punctuality, Punctuality::NotApplicable);
        assert_eq!(view.out_punctuality, Punctuality::NotApplicable);
    }

    #[test]
    fn test_status_of() {
        assert_eq!(status_of(None, None), AttendanceStatus::NotClocked);
        assert_eq!(status_of(Some(1), None), AttendanceStatus::ClockedIn);
        assert_eq!(status_of(Some(1), Some(2)), AttendanceStatus::ClockedOut);
    }

    #[test]
    fn test_read_access_rule() {
        let me = CurrentUser {
            id: Uuid::new_v4(),
            email: "a@x.io".into(),
            role: Role::Employee,
        };
        assert!(ensure_can_read(&me, me.id).is_ok());
        let err = ensure_can_read(&me, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let admin = CurrentUser {
            role: Role::Admin,
            ..me
        };
        assert!(ensure_can_read(&admin, Uuid::new_v4()).is_ok());
    }
}
