//! Refresh session storage
//!
//! One row per (user, device). Only the SHA-256 hash of a refresh token is
//! stored; rotation replaces it in place.

use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshSessionRow {
    pub id: Uuid,
    pub source_user_id: Uuid,
    pub device_id: String,
    pub token_hash: String,
    pub expires_at: i64,
    pub last_used_at: i64,
    pub revoked_at: Option<i64>,
}

/// Create the session for (user, device) or replace the existing one
pub async fn upsert(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    device_id: &str,
    token_hash: &str,
    expires_at: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO refresh_sessions
            (id, source_user_id, device_id, token_hash, created_at, expires_at, last_used_at)
         VALUES ($1, $2, $3, $4, $5, $6, $5)
         ON CONFLICT (source_user_id, device_id) DO UPDATE SET
            token_hash = EXCLUDED.token_hash,
            expires_at = EXCLUDED.expires_at,
            last_used_at = EXCLUDED.last_used_at,
            revoked_at = NULL",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(device_id)
    .bind(token_hash)
    .bind(now)
    .bind(expires_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_hash(
    exec: impl PgExecutor<'_>,
    token_hash: &str,
    device_id: &str,
) -> Result<Option<RefreshSessionRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, source_user_id, device_id, token_hash, expires_at, last_used_at, revoked_at
         FROM refresh_sessions WHERE token_hash = $1 AND device_id = $2",
    )
    .bind(token_hash)
    .bind(device_id)
    .fetch_optional(exec)
    .await
}

/// Swap the token hash if the row still holds `old_hash` and is live.
/// Returns `false` when another rotation or a revocation won the race.
pub async fn rotate(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    old_hash: &str,
    new_hash: &str,
    expires_at: i64,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE refresh_sessions
         SET token_hash = $1, expires_at = $2, last_used_at = $3
         WHERE id = $4 AND token_hash = $5 AND revoked_at IS NULL",
    )
    .bind(new_hash)
    .bind(expires_at)
    .bind(now)
    .bind(id)
    .bind(old_hash)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Revoke the user's session holding `token_hash`; already revoked rows are untouched
pub async fn revoke_by_hash(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    token_hash: &str,
    now: i64,
) -> Result<u64, sqlx::Error> {
    Ok(sqlx::query(
        "UPDATE refresh_sessions SET revoked_at = $1
         WHERE source_user_id = $2 AND token_hash = $3 AND revoked_at IS NULL",
    )
    .bind(now)
    .bind(user_id)
    .bind(token_hash)
    .execute(exec)
    .await?
    .rows_affected())
}

pub async fn revoke_by_device(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    device_id: &str,
    now: i64,
) -> Result<u64, sqlx::Error> {
    Ok(sqlx::query(
        "UPDATE refresh_sessions SET revoked_at = $1
         WHERE source_user_id = $2 AND device_id = $3 AND revoked_at IS NULL",
    )
    .bind(now)
    .bind(user_id)
    .bind(device_id)
    .execute(exec)
    .await?
    .rows_affected())
}
