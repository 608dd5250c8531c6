//! Password hashing and opaque token helpers

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use crate::error::ServiceError;
use shared::error::{AppError, ErrorCode};

/// Bytes of entropy in a rotated refresh secret
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Hash a password with argon2id. `memory_kib` is the adaptive cost.
pub fn hash_password(
    password: &str,
    memory_kib: u32,
) -> Result<String, argon2::password_hash::Error> {
    let params = Params::new(
        memory_kib,
        Params::DEFAULT_T_COST,
        Params::DEFAULT_P_COST,
        None,
    )?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Constant-time verification; cost parameters come from the PHC string
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash off the async runtime
pub async fn hash_password_blocking(
    password: String,
    memory_kib: u32,
) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || hash_password(&password, memory_kib))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {e}");
            ServiceError::App(AppError::new(ErrorCode::InternalError))
        })
}

/// Verify off the async runtime
pub async fn verify_password_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("spawn_blocking join error: {e}");
            false
        })
}

/// Hex-encoded random secret used for rotated refresh tokens
pub fn generate_refresh_secret() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::internal("Failed to generate secure random bytes"))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 hex digest stored in place of a refresh token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
