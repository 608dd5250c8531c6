//! Utility modules: logging, time zone arithmetic, input validation

pub mod logger;
pub mod time;
pub mod validation;
