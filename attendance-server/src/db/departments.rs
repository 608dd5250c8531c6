//! Departments and their clock-in/clock-out thresholds

use chrono::NaiveTime;
use shared::models::DepartmentResponse;
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub max_clock_in_time: Option<NaiveTime>,
    pub max_clock_out_time: Option<NaiveTime>,
    pub created_at: i64,
    pub updated_at: i64,
}

const COLUMNS: &str = "id, name, max_clock_in_time, max_clock_out_time, created_at, updated_at";

impl From<DepartmentRow> for DepartmentResponse {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            max_clock_in_time: row.max_clock_in_time,
            max_clock_out_time: row.max_clock_out_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert(
    exec: impl PgExecutor<'_>,
    name: &str,
    max_clock_in_time: NaiveTime,
    max_clock_out_time: NaiveTime,
    now: i64,
) -> Result<DepartmentRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO departments (id, name, max_clock_in_time, max_clock_out_time, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(max_clock_in_time)
        .bind(max_clock_out_time)
        .bind(now)
        .fetch_one(exec)
        .await
}

pub async fn find(
    exec: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DepartmentRow>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM departments WHERE id = $1 AND deleted_at IS NULL");
    sqlx::query_as(&sql).bind(id).fetch_optional(exec).await
}

pub async fn exists(exec: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(id)
    .fetch_one(exec)
    .await
}

pub async fn list(
    exec: impl PgExecutor<'_>,
    limit: u32,
    offset: i64,
) -> Result<Vec<DepartmentRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM departments WHERE deleted_at IS NULL
         ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
    );
    sqlx::query_as(&sql)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(exec)
        .await
}

pub async fn count(exec: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM departments WHERE deleted_at IS NULL")
        .fetch_one(exec)
        .await
}

/// Partial update; `None` keeps the stored value
pub async fn update(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    name: Option<&str>,
    max_clock_in_time: Option<NaiveTime>,
    max_clock_out_time: Option<NaiveTime>,
    now: i64,
) -> Result<Option<DepartmentRow>, sqlx::Error> {
    let sql = format!(
        "UPDATE departments SET
            name = COALESCE($1, name),
            max_clock_in_time = COALESCE($2, max_clock_in_time),
            max_clock_out_time = COALESCE($3, max_clock_out_time),
            updated_at = $4
         WHERE id = $5 AND deleted_at IS NULL
         RETURNING {COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(name)
        .bind(max_clock_in_time)
        .bind(max_clock_out_time)
        .bind(now)
        .bind(id)
        .fetch_optional(exec)
        .await
}

/// Soft delete; returns `false` if the department was not live
pub async fn soft_delete(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE departments SET deleted_at = $1, updated_at = $1
         WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Live departments with `updated_at` in `[start, end)`
pub async fn count_updated_between(
    exec: impl PgExecutor<'_>,
    start: i64,
    end: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM departments
         WHERE deleted_at IS NULL AND updated_at >= $1 AND updated_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(exec)
    .await
}
