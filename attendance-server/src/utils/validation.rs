//! Input validation helpers
//!
//! Length limits for free-text inputs that the derive-based validators on the
//! shared request types do not cover.

use shared::error::{AppError, AppResult};

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Display names
pub const MAX_NAME_LEN: usize = 255;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// `X-Device-ID` header value
pub const MAX_DEVICE_ID_LEN: usize = 128;

/// Header carrying the client device identifier
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_field(field, "must not be empty"));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_field(field, format!("must be at most {max_len} characters")));
    }
    Ok(())
}

/// Emails are stored lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_password_len(password: &str, field: &str) -> AppResult<()> {
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at most {MAX_PASSWORD_LEN} characters"
        ))
        .with_field(field, format!("must be at most {MAX_PASSWORD_LEN} characters")));
    }
    Ok(())
}

/// Read and check the `X-Device-ID` header
pub fn device_id_from_headers(headers: &http::HeaderMap) -> AppResult<String> {
    let value = headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(AppError::missing_device)?;
    validate_required_text(value, "X-Device-ID", MAX_DEVICE_ID_LEN)?;
    Ok(value.to_string())
}
