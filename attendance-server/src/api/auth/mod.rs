//! Auth API Module

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Unauthenticated routes: signup, signin, refresh
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handler::signup))
        .route("/auth/signin", post(handler::signin))
        .route("/auth/refresh", post(handler::refresh))
}

/// Routes that require a bearer token
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signout", post(handler::signout))
        .route("/auth/change-password", post(handler::change_password))
}
