//! Shared types for the attendance service
//!
//! Error codes, the response envelope, and the request/response models
//! used by the server and its clients.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use response::{ApiResponse, PageQuery, PageWindow, Pagination};
pub use serde::{Deserialize, Serialize};
