//! Data models
//!
//! Request and response payloads shared by the server and its clients.
//! Ids are UUIDs; timestamps are Unix millis.

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod department;
pub mod role;
pub mod user;

// Re-exports
pub use attendance::*;
pub use auth::*;
pub use dashboard::*;
pub use department::*;
pub use role::*;
pub use user::*;
