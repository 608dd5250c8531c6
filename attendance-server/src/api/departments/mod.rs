//! Department API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    // Reads are open to any authenticated principal
    let read_routes = Router::new()
        .route("/departments", get(handler::list))
        .route("/departments/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/departments", post(handler::create))
        .route("/departments/assignment", post(handler::assign))
        .route(
            "/departments/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
