//! Health check endpoint

use axum::Json;
use axum::extract::State;
use http::StatusCode;

use crate::state::AppState;

/// GET /health: liveness plus a database probe
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map(|_| "ok")
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Health check database probe failed");
            "unavailable"
        });

    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "service": "attendance-server",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
        })),
    )
}
