//! attendance-server: employee attendance HTTP backend
//!
//! - Identity: accounts, profiles, roles, department assignment
//! - Sessions: JWT access tokens, refresh rotation bound to a device
//! - Departments: clock-in/clock-out thresholds
//! - Attendance: one clock-in/clock-out record per employee per local day
//! - Reporting: logs with punctuality, history, status, admin dashboard

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod util;
pub mod utils;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
