//! HTTP API
//!
//! # Structure
//!
//! - [`auth`] - signup, signin, refresh, signout, change password
//! - [`profile`] - the caller's own profile
//! - [`users`] - user listing and role changes (admin)
//! - [`departments`] - department CRUD and assignment
//! - [`attendance`] - clock in/out, logs, history, status
//! - [`admin`] - dashboard (admin)
//! - [`health`] - liveness and database probe

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod departments;
pub mod extract;
pub mod health;
pub mod profile;
pub mod users;

use std::time::Duration;

use axum::routing::get;
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method, StatusCode, header};
use shared::error::AppError;
use shared::response::ApiResponse;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::rate_limit::rate_limit;
use crate::auth::{require_admin, require_auth};
use crate::config::Config;
use crate::state::AppState;
use crate::utils::validation::DEVICE_ID_HEADER;

/// Handler result: the success envelope or the error envelope
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

pub const API_PREFIX: &str = "/api/v1";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request bodies larger than this are rejected with 413
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Routes under [`API_PREFIX`], with auth and admin guards but no tower layers
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .merge(users::router())
        .merge(admin::router())
        .route_layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .merge(auth::router())
        .merge(profile::router())
        .merge(departments::router())
        .merge(attendance::router())
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(auth::public_router())
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(DEVICE_ID_HEADER),
        ])
}

/// Requests still running after `secs` are answered with 408
pub fn timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}

/// Build the full application: routes, guards, and tower middleware
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let config = state.config.clone();

    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, api_routes(&state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(timeout_layer(config.request_timeout_secs))
        .layer(cors_layer(&config))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
