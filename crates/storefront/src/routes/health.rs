//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Probes the backend (and through it, the database). Returns 503 Service
/// Unavailable if the backend is unreachable or reports itself unhealthy.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.backend().health().await {
        Ok(health) if health.is_healthy() => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "backend": health.status })),
        ),
        Ok(health) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "backend": health.status,
                "database": health.database,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Backend health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
