//! Role assignments (one current role per user)

use shared::models::Role;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Insert or replace the user's role
pub async fn upsert(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    role: Role,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO roles (id, source_user_id, role, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4)
         ON CONFLICT (source_user_id)
         DO UPDATE SET role = EXCLUDED.role, updated_at = EXCLUDED.updated_at, deleted_at = NULL",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role.as_str())
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

/// Current role; a missing assignment is the default `employee`
pub async fn find(exec: impl PgExecutor<'_>, user_id: Uuid) -> Result<Role, sqlx::Error> {
    let role: Option<String> = sqlx::query_scalar(
        "SELECT role FROM roles WHERE source_user_id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .fetch_optional(exec)
    .await?;
    Ok(role.as_deref().map(Role::from_db).unwrap_or_default())
}
