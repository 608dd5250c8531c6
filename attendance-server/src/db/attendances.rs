//! Daily attendance records, their history events, and the log query

use chrono::NaiveTime;
use shared::models::{AttendanceHistoryResponse, AttendanceResponse, AttendanceType};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::filter::QueryFilter;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub employee_code: String,
    pub attendance_id: String,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

const COLUMNS: &str = "id, employee_code, attendance_id, clock_in, clock_out, created_at, updated_at";

impl From<AttendanceRow> for AttendanceResponse {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            employee_code: row.employee_code,
            attendance_id: row.attendance_id,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_by_attendance_id(
    exec: impl PgExecutor<'_>,
    attendance_id: &str,
) -> Result<Option<AttendanceRow>, sqlx::Error> {
    let sql =
        format!("SELECT {COLUMNS} FROM attendances WHERE attendance_id = $1 AND deleted_at IS NULL");
    sqlx::query_as(&sql)
        .bind(attendance_id)
        .fetch_optional(exec)
        .await
}

/// Open today's record. A concurrent insert of the same `attendance_id`
/// fails with a unique violation on `attendances_attendance_id_key`.
pub async fn insert_clock_in(
    exec: impl PgExecutor<'_>,
    employee_code: &str,
    attendance_id: &str,
    now: i64,
) -> Result<AttendanceRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO attendances (id, employee_code, attendance_id, clock_in, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4, $4)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(employee_code)
        .bind(attendance_id)
        .bind(now)
        .fetch_one(exec)
        .await
}

/// Close the record; `None` if it is already closed (or gone)
pub async fn set_clock_out(
    exec: impl PgExecutor<'_>,
    attendance_id: &str,
    now: i64,
) -> Result<Option<AttendanceRow>, sqlx::Error> {
    let sql = format!(
        "UPDATE attendances SET clock_out = $1, updated_at = $1
         WHERE attendance_id = $2 AND deleted_at IS NULL AND clock_out IS NULL
         RETURNING {COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(now)
        .bind(attendance_id)
        .fetch_optional(exec)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub employee_code: String,
    pub attendance_id: String,
    pub date_attendance: i64,
    pub attendance_type: String,
    pub description: String,
}

impl From<HistoryRow> for AttendanceHistoryResponse {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            employee_code: row.employee_code,
            attendance_id: row.attendance_id,
            date_attendance: row.date_attendance,
            attendance_type: AttendanceType::from_db(&row.attendance_type)
                .unwrap_or(AttendanceType::In),
            description: row.description,
        }
    }
}

pub async fn insert_history(
    exec: impl PgExecutor<'_>,
    employee_code: &str,
    attendance_id: &str,
    attendance_type: AttendanceType,
    description: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO attendance_histories
            (id, employee_code, attendance_id, date_attendance, attendance_type, description,
             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $4, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(employee_code)
    .bind(attendance_id)
    .bind(now)
    .bind(attendance_type.as_str())
    .bind(description)
    .execute(exec)
    .await?;
    Ok(())
}

/// History for one employee, newest first
pub async fn list_history(
    pool: &PgPool,
    employee_code: &str,
    limit: u32,
    offset: i64,
) -> Result<(Vec<HistoryRow>, u64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance_histories
         WHERE employee_code = $1 AND deleted_at IS NULL",
    )
    .bind(employee_code)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as(
        "SELECT id, employee_code, attendance_id, date_attendance, attendance_type, description
         FROM attendance_histories
         WHERE employee_code = $1 AND deleted_at IS NULL
         ORDER BY date_attendance DESC, id
         LIMIT $2 OFFSET $3",
    )
    .bind(employee_code)
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((rows, total.max(0) as u64))
}

/// Log row with the thresholds needed to derive punctuality
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LogRow {
    pub attendance_id: String,
    pub employee_code: String,
    pub full_name: String,
    pub department_id: Option<Uuid>,
    pub department_name: String,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub max_clock_in_time: Option<NaiveTime>,
    pub max_clock_out_time: Option<NaiveTime>,
}

const LOG_FROM: &str = "FROM attendances a
     JOIN profiles p ON p.employee_code = a.employee_code AND p.deleted_at IS NULL
     LEFT JOIN departments d ON d.id = p.department_id AND d.deleted_at IS NULL";

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// `[start, end)` millis of one local day
    pub day: Option<(i64, i64)>,
    pub department_id: Option<Uuid>,
}

impl LogFilter {
    fn to_query_filter(&self) -> QueryFilter {
        let mut filter = QueryFilter::new();
        filter.alive("a");
        if let Some((start, end)) = self.day {
            filter
                .add_condition("a.clock_in >= ? AND a.clock_in < ?")
                .bind_i64(start)
                .bind_i64(end);
        }
        if let Some(department_id) = self.department_id {
            filter
                .add_condition("p.department_id = ?")
                .bind_uuid(department_id);
        }
        filter
    }
}

pub async fn list_logs(
    pool: &PgPool,
    filter: &LogFilter,
    limit: u32,
    offset: i64,
) -> Result<(Vec<LogRow>, u64), sqlx::Error> {
    let qf = filter.to_query_filter();
    let where_clause = qf.build_where_clause();

    let count_sql = format!("SELECT COUNT(*) {LOG_FROM}{where_clause}");
    let total: i64 = qf
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT a.attendance_id, a.employee_code, p.full_name, d.id AS department_id,
                COALESCE(d.name, '') AS department_name, a.clock_in, a.clock_out,
                d.max_clock_in_time, d.max_clock_out_time
         {LOG_FROM}{where_clause}
         ORDER BY a.clock_in DESC NULLS LAST, a.attendance_id{}",
        qf.limit_offset_clause()
    );
    let rows = qf
        .apply_bindings_as(sqlx::query_as(&sql))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((rows, total.max(0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_clause() {
        let filter = LogFilter {
            day: Some((0, 86_400_000)),
            department_id: Some(Uuid::nil()),
        };
        let qf = filter.to_query_filter();
        assert_eq!(
            qf.build_where_clause(),
            " WHERE a.deleted_at IS NULL AND a.clock_in >= $1 AND a.clock_in < $2 AND p.department_id = $3"
        );
        assert_eq!(qf.limit_offset_clause(), " LIMIT $4 OFFSET $5");
    }

    #[test]
    fn test_history_row_maps_type() {
        let row = HistoryRow {
            id: Uuid::nil(),
            employee_code: "EMP-1".into(),
            attendance_id: "EMP-1-2025-09-15".into(),
            date_attendance: 0,
            attendance_type: "out".into(),
            description: "Clock out".into(),
        };
        let view = AttendanceHistoryResponse::from(row);
        assert_eq!(view.attendance_type, AttendanceType::Out);
    }
}
