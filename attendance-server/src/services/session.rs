//! Session use-cases: signin, refresh rotation, signout, password change
//!
//! A refresh session is one row per (user, device). Signin upserts it with the
//! signin refresh token's hash; each refresh swaps the hash for a fresh random
//! secret. Rotation is an optimistic update predicated on the old hash, so of
//! several concurrent refreshes with the same token exactly one wins.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChangePasswordRequest, RefreshResponse, SigninRequest, SigninResponse, UserStatus,
};
use uuid::Uuid;

use crate::auth::jwt::{CurrentUser, JwtError};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::security_log;
use crate::services::account;
use crate::state::AppState;
use crate::util::{
    generate_refresh_secret, hash_password_blocking, hash_token, verify_password_blocking,
};
use crate::utils::validation::{normalize_email, validate_password_len};

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

impl From<JwtError> for ServiceError {
    fn from(e: JwtError) -> Self {
        tracing::error!(error = %e, "Token minting failed");
        ServiceError::App(AppError::new(ErrorCode::InternalError))
    }
}

fn signin_expiry(state: &AppState, now: i64) -> i64 {
    now + state.config.refresh_token_ttl_hours * MILLIS_PER_HOUR
}

fn rotation_expiry(state: &AppState, now: i64) -> i64 {
    now + state.config.refresh_rotation_ttl_days * MILLIS_PER_DAY
}

/// Authenticate with email and password and open a session on `device_id`
pub async fn signin(
    state: &AppState,
    req: SigninRequest,
    device_id: &str,
    now: i64,
) -> ServiceResult<SigninResponse> {
    let email = normalize_email(&req.email);

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        security_log!("WARN", "signin_failed", reason = "unknown_email", device_id = device_id);
        return Err(AppError::invalid_credentials().into());
    };
    let Some(stored_hash) = db::users::find_password_hash(&state.pool, user.id).await? else {
        security_log!(
            "WARN",
            "signin_failed",
            reason = "no_credential",
            user_id = user.id.to_string()
        );
        return Err(AppError::invalid_credentials().into());
    };
    if !verify_password_blocking(req.password, stored_hash).await {
        security_log!(
            "WARN",
            "signin_failed",
            reason = "bad_password",
            user_id = user.id.to_string(),
            device_id = device_id
        );
        return Err(AppError::invalid_credentials().into());
    }
    if UserStatus::from_db(&user.status) != UserStatus::Active {
        security_log!("WARN", "signin_disabled", user_id = user.id.to_string());
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let role = db::roles::find(&state.pool, user.id).await?;
    let access_token = state.jwt.generate_access_token(user.id, &user.email, role)?;
    let refresh_token = state.jwt.generate_refresh_token(user.id)?;

    db::refresh_sessions::upsert(
        &state.pool,
        user.id,
        device_id,
        &hash_token(&refresh_token),
        signin_expiry(state, now),
        now,
    )
    .await?;

    let view = account::get_profile(state, user.id).await?;
    tracing::info!(user_id = %user.id, device_id = %device_id, role = %role, "User signed in");

    Ok(SigninResponse {
        access_token,
        refresh_token,
        user: view,
    })
}

/// Exchange a refresh token for a new access token and a rotated refresh secret
pub async fn refresh(
    state: &AppState,
    refresh_token: &str,
    device_id: &str,
    now: i64,
) -> ServiceResult<RefreshResponse> {
    let presented_hash = hash_token(refresh_token.trim());

    let Some(session) =
        db::refresh_sessions::find_by_hash(&state.pool, &presented_hash, device_id).await?
    else {
        security_log!("WARN", "refresh_invalid", device_id = device_id);
        return Err(AppError::new(ErrorCode::RefreshInvalid).into());
    };
    if session.revoked_at.is_some() {
        security_log!(
            "WARN",
            "refresh_revoked",
            user_id = session.source_user_id.to_string(),
            device_id = device_id
        );
        return Err(AppError::new(ErrorCode::RefreshRevoked).into());
    }
    if now >= session.expires_at {
        return Err(AppError::new(ErrorCode::RefreshExpired).into());
    }

    let user = db::users::find_by_id(&state.pool, session.source_user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RefreshInvalid))?;
    if UserStatus::from_db(&user.status) != UserStatus::Active {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let role = db::roles::find(&state.pool, user.id).await?;
    let access_token = state.jwt.generate_access_token(user.id, &user.email, role)?;
    let new_secret = generate_refresh_secret()?;

    let rotated = db::refresh_sessions::rotate(
        &state.pool,
        session.id,
        &session.token_hash,
        &hash_token(&new_secret),
        rotation_expiry(state, now),
        now,
    )
    .await?;
    if !rotated {
        security_log!(
            "WARN",
            "refresh_replayed",
            user_id = user.id.to_string(),
            device_id = device_id
        );
        return Err(AppError::new(ErrorCode::RefreshInvalid).into());
    }

    tracing::debug!(user_id = %user.id, device_id = %device_id, "Refresh session rotated");

    Ok(RefreshResponse {
        access_token,
        refresh_token: new_secret,
    })
}

/// Revoke the caller's session named by `refresh_token`, else the one on
/// `device_id`. Unknown or already revoked sessions are not an error.
pub async fn signout(
    state: &AppState,
    user: &CurrentUser,
    refresh_token: Option<&str>,
    device_id: Option<&str>,
    now: i64,
) -> ServiceResult<u64> {
    let refresh_token = refresh_token.map(str::trim).filter(|t| !t.is_empty());

    let revoked = match (refresh_token, device_id) {
        (Some(token), _) => {
            db::refresh_sessions::revoke_by_hash(&state.pool, user.id, &hash_token(token), now)
                .await?
        }
        (None, Some(device_id)) => {
            db::refresh_sessions::revoke_by_device(&state.pool, user.id, device_id, now).await?
        }
        (None, None) => 0,
    };

    tracing::info!(user_id = %user.id, revoked, "User signed out");
    Ok(revoked)
}

/// Replace the password after verifying the current one.
/// Existing refresh sessions stay valid.
pub async fn change_password(
    state: &AppState,
    user_id: Uuid,
    req: ChangePasswordRequest,
    now: i64,
) -> ServiceResult<()> {
    validate_password_len(&req.new_password, "new_password")?;

    let stored_hash = db::users::find_password_hash(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !verify_password_blocking(req.old_password, stored_hash).await {
        security_log!(
            "WARN",
            "change_password_failed",
            user_id = user_id.to_string()
        );
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Old password is incorrect",
        )
        .into());
    }

    let new_hash =
        hash_password_blocking(req.new_password, state.config.password_hash_cost).await?;
    if !db::users::update_password_hash(&state.pool, user_id, &new_hash, now).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }

    security_log!("INFO", "password_changed", user_id = user_id.to_string());
    Ok(())
}
