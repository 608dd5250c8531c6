//! Employee profiles and the joined user view

use chrono::NaiveTime;
use shared::models::{DepartmentResponse, Role, UserResponse, UserStatus};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::filter::QueryFilter;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub source_user_id: Uuid,
    pub employee_code: String,
    pub department_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub avatar_url: String,
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}

const PROFILE_COLUMNS: &str = "id, source_user_id, employee_code, department_id, full_name, \
     phone, avatar_url, address, created_at, updated_at";

/// Profile joined with its user, role and (live) department
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserViewRow {
    pub id: Uuid,
    pub source_user_id: Uuid,
    pub employee_code: String,
    pub email: String,
    pub status: String,
    pub role: String,
    pub department_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub avatar_url: String,
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub dept_name: Option<String>,
    pub dept_max_clock_in_time: Option<NaiveTime>,
    pub dept_max_clock_out_time: Option<NaiveTime>,
    pub dept_created_at: Option<i64>,
    pub dept_updated_at: Option<i64>,
}

const USER_VIEW_SELECT: &str = "SELECT p.id, p.source_user_id, p.employee_code, u.email, u.status,
        COALESCE(r.role, 'employee') AS role, d.id AS department_id,
        p.full_name, p.phone, p.avatar_url, p.address, p.created_at, p.updated_at,
        d.name AS dept_name, d.max_clock_in_time AS dept_max_clock_in_time,
        d.max_clock_out_time AS dept_max_clock_out_time,
        d.created_at AS dept_created_at, d.updated_at AS dept_updated_at
     FROM profiles p
     JOIN users u ON u.id = p.source_user_id AND u.deleted_at IS NULL
     LEFT JOIN roles r ON r.source_user_id = p.source_user_id AND r.deleted_at IS NULL
     LEFT JOIN departments d ON d.id = p.department_id AND d.deleted_at IS NULL";

const USER_VIEW_FROM: &str = "FROM profiles p
     JOIN users u ON u.id = p.source_user_id AND u.deleted_at IS NULL";

impl From<UserViewRow> for UserResponse {
    fn from(row: UserViewRow) -> Self {
        let department = match (row.department_id, row.dept_name) {
            (Some(id), Some(name)) => Some(DepartmentResponse {
                id,
                name,
                max_clock_in_time: row.dept_max_clock_in_time,
                max_clock_out_time: row.dept_max_clock_out_time,
                created_at: row.dept_created_at.unwrap_or_default(),
                updated_at: row.dept_updated_at.unwrap_or_default(),
            }),
            _ => None,
        };
        Self {
            id: row.id,
            source_user_id: row.source_user_id,
            employee_code: row.employee_code,
            email: row.email,
            status: UserStatus::from_db(&row.status),
            role: Role::from_db(&row.role),
            department_id: row.department_id,
            department,
            full_name: row.full_name,
            phone: row.phone,
            avatar_url: row.avatar_url,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    employee_code: &str,
    full_name: &str,
    now: i64,
) -> Result<ProfileRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO profiles (id, source_user_id, employee_code, full_name, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(employee_code)
        .bind(full_name)
        .bind(now)
        .fetch_one(exec)
        .await
}

pub async fn find_by_user(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles
         WHERE source_user_id = $1 AND deleted_at IS NULL"
    );
    sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_optional(exec)
        .await
}

pub async fn find_view(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<UserViewRow>, sqlx::Error> {
    let sql = format!("{USER_VIEW_SELECT} WHERE p.source_user_id = $1 AND p.deleted_at IS NULL");
    sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_optional(exec)
        .await
}

/// Fields to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch<'a> {
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub address: Option<&'a str>,
}

pub async fn update(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    patch: &ProfilePatch<'_>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE profiles SET
            full_name = COALESCE($1, full_name),
            phone = COALESCE($2, phone),
            avatar_url = COALESCE($3, avatar_url),
            address = COALESCE($4, address),
            updated_at = $5
         WHERE source_user_id = $6 AND deleted_at IS NULL",
    )
    .bind(patch.full_name)
    .bind(patch.phone)
    .bind(patch.avatar_url)
    .bind(patch.address)
    .bind(now)
    .bind(user_id)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Set or clear the department reference
pub async fn set_department(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    department_id: Option<Uuid>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE profiles SET department_id = $1, updated_at = $2
         WHERE source_user_id = $3 AND deleted_at IS NULL",
    )
    .bind(department_id)
    .bind(now)
    .bind(user_id)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Detach every profile from a department
pub async fn clear_department(
    exec: impl PgExecutor<'_>,
    department_id: Uuid,
    now: i64,
) -> Result<u64, sqlx::Error> {
    Ok(sqlx::query(
        "UPDATE profiles SET department_id = NULL, updated_at = $1 WHERE department_id = $2",
    )
    .bind(now)
    .bind(department_id)
    .execute(exec)
    .await?
    .rows_affected())
}

/// Filters for [`list_views`]; dates are already converted to millis
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub department_id: Option<Uuid>,
    /// inclusive
    pub created_from: Option<i64>,
    /// exclusive
    pub created_until: Option<i64>,
}

impl ProfileFilter {
    fn to_query_filter(&self) -> QueryFilter {
        let mut filter = QueryFilter::new();
        filter.alive("p");
        if let Some(email) = &self.email {
            filter.add_contains("u.email", email);
        }
        if let Some(status) = self.status {
            filter.add_condition("u.status = ?").bind_text(status.as_str());
        }
        if let Some(department_id) = self.department_id {
            filter
                .add_condition("p.department_id = ?")
                .bind_uuid(department_id);
        }
        if let Some(from) = self.created_from {
            filter.add_condition("p.created_at >= ?").bind_i64(from);
        }
        if let Some(until) = self.created_until {
            filter.add_condition("p.created_at < ?").bind_i64(until);
        }
        filter
    }
}

/// One page of user views, newest first
pub async fn list_views(
    pool: &PgPool,
    filter: &ProfileFilter,
    limit: u32,
    offset: i64,
) -> Result<(Vec<UserViewRow>, u64), sqlx::Error> {
    let qf = filter.to_query_filter();
    let where_clause = qf.build_where_clause();

    let count_sql = format!("SELECT COUNT(*) {USER_VIEW_FROM}{where_clause}");
    let total: i64 = qf
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{USER_VIEW_SELECT}{where_clause} ORDER BY p.created_at DESC, p.id{}",
        qf.limit_offset_clause()
    );
    let rows: Vec<UserViewRow> = qf
        .apply_bindings_as(sqlx::query_as(&sql))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((rows, total.max(0) as u64))
}

/// (department name, live employee count), including empty departments
pub async fn count_per_department(
    exec: impl PgExecutor<'_>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT d.name, COUNT(p.id)
         FROM departments d
         LEFT JOIN profiles p ON p.department_id = d.id AND p.deleted_at IS NULL
         WHERE d.deleted_at IS NULL
         GROUP BY d.id, d.name
         ORDER BY d.name",
    )
    .fetch_all(exec)
    .await
}

/// Profiles created in `[start, end)`
pub async fn count_created_between(
    exec: impl PgExecutor<'_>,
    start: i64,
    end: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM profiles
         WHERE deleted_at IS NULL AND created_at >= $1 AND created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(exec)
    .await
}
