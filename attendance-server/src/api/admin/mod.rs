//! Admin API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Admin-only; the caller layers `require_admin`
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(handler::dashboard))
}
