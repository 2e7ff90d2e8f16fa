//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{Analyzer, SharedHistory, DEFAULT_QUERY_LIMIT};
use crate::config::Config;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs submissions against the prediction service and records them
    pub analyzer: Analyzer,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analyzer: Analyzer, config: ApiConfig) -> Self {
        Self {
            analyzer,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// The recent history store
    pub fn history(&self) -> &SharedHistory {
        self.analyzer.history()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Posts requested per social search when the request gives no limit
    pub default_query_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8083,
            default_query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            default_query_limit: config.prediction.default_limit,
        }
    }
}
