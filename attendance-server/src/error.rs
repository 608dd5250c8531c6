//! Service-layer error type
//!
//! `ServiceError` bridges repository errors (`sqlx::Error`, `BoxError`) and the
//! API-layer [`AppError`], so services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unique constraints whose violation is a client-facing conflict
const UNIQUE_CONFLICTS: &[(&str, ErrorCode)] = &[
    ("users_email_key", ErrorCode::EmailExists),
    ("profiles_employee_code_key", ErrorCode::EmployeeCodeExists),
    ("attendances_attendance_id_key", ErrorCode::AlreadyClockedIn),
];

/// - `Db`: database or infrastructure failure (logged, surfaced as InternalError)
/// - `App`: business-rule error passed through to the client
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl ServiceError {
    /// Error code carried by an `App` error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ServiceError::App(e) => Some(e.code),
            ServiceError::Db(_) => None,
        }
    }
}

/// Map a unique violation to its conflict code, if the constraint is known
pub fn unique_conflict(err: &sqlx::Error) -> Option<ErrorCode> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    let constraint = db_err.constraint()?;
    UNIQUE_CONFLICTS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, code)| *code)
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match unique_conflict(&e) {
            Some(code) => ServiceError::App(AppError::new(code)),
            None => ServiceError::Db(e.into()),
        }
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
