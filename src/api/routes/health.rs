//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Full health status, including the prediction service

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// The dashboard still serves history when the prediction service is down,
/// so an unreachable service only degrades the status.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let upstream_ok = match state.analyzer.api().health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Prediction service health check failed");
            false
        }
    };

    let history_records = state.history().read().await.len();

    Json(HealthResponse {
        status: (if upstream_ok { "healthy" } else { "degraded" }).to_string(),
        prediction_service: (if upstream_ok { "ok" } else { "unavailable" }).to_string(),
        history_records,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
