//! Attendance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attendance/clock-in", post(handler::clock_in))
        .route("/attendance/clock-out", put(handler::clock_out))
        .route("/attendance/logs", get(handler::logs))
        .route("/attendance/history", get(handler::history))
        .route("/attendance/status", get(handler::status))
}
