//! User administration API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Admin-only; the caller layers `require_admin`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handler::list))
        .route("/users/{id}/role", put(handler::change_role))
}
