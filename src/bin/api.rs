//! Sentiscope Dashboard API Server
//!
//! Run with: cargo run --bin sentiscope-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see `sentiscope config`),
//! then applies environment overrides:
//! - `SENTISCOPE_DATA_DIR`: Directory holding the recent analyses
//! - `SENTISCOPE_PREDICTION_URL`: Prediction service URL (default: http://localhost:8000)
//! - `SENTISCOPE_API_HOST` / `SENTISCOPE_API_PORT`: Bind address (default: 127.0.0.1:8083)
//! - `RUST_LOG`: Log filter (overrides the configured level)

use sentiscope::analysis::Analyzer;
use sentiscope::api::{serve, ApiConfig, AppState};
use sentiscope::config::Config;
use sentiscope::history::RecentHistoryStore;
use sentiscope::predict::{PredictionClient, SentimentApi};
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = Config::load_default()?;
    sentiscope::logging::init(&config.logging);

    tracing::info!("Starting Sentiscope API server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("No config file found, using defaults"),
    }

    let storage = config.history.storage();
    tracing::info!("History file: {:?}", storage.path());
    let history = Arc::new(RwLock::new(RecentHistoryStore::open(storage)));
    tracing::info!(
        "History store ready ({} records)",
        history.read().await.len()
    );

    let client = PredictionClient::new(config.prediction.client_config())?;
    match client.health_check().await {
        Ok(()) => tracing::info!("Prediction service reachable at {}", config.prediction.base_url),
        Err(e) => tracing::warn!(
            "Prediction service not available at {}: {} (analysis requests will fail until it is)",
            config.prediction.base_url,
            e
        ),
    }

    let analyzer = Analyzer::new(Arc::new(client), history);
    let api_config = ApiConfig::from(&config);
    let state = AppState::new(analyzer, api_config.clone());

    serve(state, &api_config).await?;

    Ok(())
}
