//! Unified error codes for the attendance service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Identity errors (users, profiles)
//! - 4xxx: Department errors
//! - 5xxx: Attendance errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Rate limit exceeded
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Access token has expired
    TokenExpired = 1003,
    /// Access token is invalid
    TokenInvalid = 1004,
    /// Refresh token unknown or already rotated
    RefreshInvalid = 1005,
    /// Refresh session expired
    RefreshExpired = 1006,
    /// Refresh session revoked
    RefreshRevoked = 1007,
    /// X-Device-ID header missing
    MissingDevice = 1008,
    /// Account is disabled
    AccountDisabled = 1009,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Admins cannot be placed in a department
    AdminNotAssignable = 2004,
    /// Principal has no department to scope reads to
    NoDepartmentAccess = 2005,

    // ==================== 3xxx: Identity ====================
    /// User not found
    UserNotFound = 3001,
    /// Profile not found
    ProfileNotFound = 3002,
    /// Email already registered
    EmailExists = 3003,
    /// Employee code already taken
    EmployeeCodeExists = 3004,

    // ==================== 4xxx: Department ====================
    /// Department not found
    DepartmentNotFound = 4001,
    /// Department lacks a clock-in/clock-out threshold
    DepartmentMisconfigured = 4002,
    /// Employee is not assigned to any department
    NoDepartment = 4003,

    // ==================== 5xxx: Attendance ====================
    /// Already clocked in today
    AlreadyClockedIn = 5001,
    /// Already clocked out today
    AlreadyClockedOut = 5002,
    /// No clock-in recorded today
    NoClockInToday = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshInvalid => "Invalid refresh token",
            ErrorCode::RefreshExpired => "Refresh token has expired",
            ErrorCode::RefreshRevoked => "Refresh token has been revoked",
            ErrorCode::MissingDevice => "Device ID required",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::AdminNotAssignable => "admin cannot be assigned to department",
            ErrorCode::NoDepartmentAccess => "no access: user is not assigned to a department",

            // Identity
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::ProfileNotFound => "Profile not found",
            ErrorCode::EmailExists => "Email already registered",
            ErrorCode::EmployeeCodeExists => "Employee code already exists",

            // Department
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentMisconfigured => {
                "Department has no clock-in/clock-out threshold configured"
            }
            ErrorCode::NoDepartment => "Employee is not assigned to a department",

            // Attendance
            ErrorCode::AlreadyClockedIn => "already clocked in today",
            ErrorCode::AlreadyClockedOut => "already clocked out today",
            ErrorCode::NoClockInToday => "no clock-in record for today",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::RefreshInvalid),
            1006 => Ok(ErrorCode::RefreshExpired),
            1007 => Ok(ErrorCode::RefreshRevoked),
            1008 => Ok(ErrorCode::MissingDevice),
            1009 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::AdminNotAssignable),
            2005 => Ok(ErrorCode::NoDepartmentAccess),

            // Identity
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::ProfileNotFound),
            3003 => Ok(ErrorCode::EmailExists),
            3004 => Ok(ErrorCode::EmployeeCodeExists),

            // Department
            4001 => Ok(ErrorCode::DepartmentNotFound),
            4002 => Ok(ErrorCode::DepartmentMisconfigured),
            4003 => Ok(ErrorCode::NoDepartment),

            // Attendance
            5001 => Ok(ErrorCode::AlreadyClockedIn),
            5002 => Ok(ErrorCode::AlreadyClockedOut),
            5003 => Ok(ErrorCode::NoClockInToday),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AdminNotAssignable.code(), 2004);
        assert_eq!(ErrorCode::EmailExists.code(), 3003);
        assert_eq!(ErrorCode::DepartmentMisconfigured.code(), 4002);
        assert_eq!(ErrorCode::AlreadyClockedIn.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NoClockInToday).unwrap();
        assert_eq!(json, "5003");

        let code: ErrorCode = serde_json::from_str("1005").unwrap();
        assert_eq!(code, ErrorCode::RefreshInvalid);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("6001");
        assert!(result.is_err());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::TooManyRequests,
            ErrorCode::MissingDevice,
            ErrorCode::AccountDisabled,
            ErrorCode::NoDepartmentAccess,
            ErrorCode::EmployeeCodeExists,
            ErrorCode::NoDepartment,
            ErrorCode::AlreadyClockedOut,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_message() {
        assert!(ErrorCode::AlreadyClockedIn.message().contains("already clocked in"));
        assert_eq!(
            ErrorCode::AdminNotAssignable.message(),
            "admin cannot be assigned to department"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
