//! Repository layer: one module per table, free functions over sqlx executors
//!
//! Every query filters soft-deleted rows (`deleted_at IS NULL`).

pub mod attendances;
pub mod departments;
pub mod filter;
pub mod profiles;
pub mod refresh_sessions;
pub mod roles;
pub mod users;
