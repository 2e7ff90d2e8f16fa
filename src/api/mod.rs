//! Sentiscope Dashboard API
//!
//! HTTP API layer for the dashboard front-end, built with Axum.
//!
//! # Endpoints
//!
//! ## History
//! - `GET /api/v1/history` - Recent analyses, newest first
//! - `GET /api/v1/history/:id` - One recent analysis
//! - `DELETE /api/v1/history` - Clear the history
//!
//! ## Overview
//! - `GET /api/v1/overview` - Sentiment distribution and per-source counts
//!
//! ## Analysis
//! - `POST /api/v1/analyze/single` - Analyze one text
//! - `POST /api/v1/analyze/batch` - Analyze a CSV upload (raw body)
//! - `GET /api/v1/analyze/reddit/:query` - Analyze Reddit posts
//! - `GET /api/v1/analyze/twitter/:query` - Analyze tweets
//!
//! ## Export
//! - `GET /api/v1/export` - Download the history as JSON or CSV
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use sentiscope::analysis::Analyzer;
//! use sentiscope::api::{serve, ApiConfig, AppState};
//! use sentiscope::history::{FileStorage, RecentHistoryStore};
//! use sentiscope::predict::{PredictionClient, PredictionConfig};
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let history = RecentHistoryStore::open(FileStorage::new("./data", "recentAnalyses"));
//!     let client = PredictionClient::new(PredictionConfig::default())?;
//!     let analyzer = Analyzer::new(Arc::new(client), Arc::new(RwLock::new(history)));
//!
//!     let config = ApiConfig::default();
//!     serve(AppState::new(analyzer, config.clone()), &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // History routes
        .route(
            "/history",
            get(routes::history::list_history).delete(routes::history::clear_history),
        )
        .route("/history/:id", get(routes::history::get_record))
        // Overview
        .route("/overview", get(routes::overview::get_overview))
        // Export
        .route("/export", get(routes::export::export_history))
        // Analysis routes
        .route("/analyze/single", post(routes::analyze::analyze_single))
        .route("/analyze/reddit/:query", get(routes::analyze::analyze_reddit))
        .route("/analyze/twitter/:query", get(routes::analyze::analyze_twitter))
        // CSV uploads get a larger body limit (20 MB)
        .route(
            "/analyze/batch",
            post(routes::analyze::analyze_batch).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sentiscope API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sentiscope API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
