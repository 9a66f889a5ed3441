use crate::startup::AppState;
use axum::{extract::State, http::StatusCode};

/// Liveness probe: the process is up.
pub async fn liveness_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "API is alive")
}

/// Readiness probe: the store answers a ping.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "API is ready to receive traffic"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database connection failed")
        }
    }
}

/// Kept for clients that still poll the old endpoint.
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "API is running")
}
