//! Users and their password credentials

use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    pub email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

pub async fn insert(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    email: &str,
    status: &str,
    email_verified: bool,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, status, email_verified, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)",
    )
    .bind(id)
    .bind(email)
    .bind(status)
    .bind(email_verified)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_email(
    exec: impl PgExecutor<'_>,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, email, status, email_verified, created_at, updated_at
         FROM users WHERE email = $1 AND deleted_at IS NULL",
    )
    .bind(email)
    .fetch_optional(exec)
    .await
}

pub async fn find_by_id(
    exec: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, email, status, email_verified, created_at, updated_at
         FROM users WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(exec)
    .await
}

pub async fn insert_credential(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    password_hash: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_credentials (id, source_user_id, password_hash, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(password_hash)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_password_hash(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT password_hash FROM user_credentials
         WHERE source_user_id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .fetch_optional(exec)
    .await
}

/// Returns `false` when the user has no credential row
pub async fn update_password_hash(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    password_hash: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE user_credentials SET password_hash = $1, updated_at = $2
         WHERE source_user_id = $3 AND deleted_at IS NULL",
    )
    .bind(password_hash)
    .bind(now)
    .bind(user_id)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows == 1)
}
