//! # Sentiscope
//!
//! Sentiment analysis dashboard. Submit a single text, a CSV batch or a
//! social-media search to a sentiment-classification service and review the
//! most recent results as tables and aggregate charts.
//!
//! ## Modules
//!
//! - [`history`]: Bounded, persisted log of the most recent analyses
//! - [`predict`]: Client for the external prediction service
//! - [`analysis`]: Runs submissions and records their results
//! - [`overview`]: Label counts for the overview charts
//! - [`api`]: Dashboard REST API with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentiscope::analysis::Analyzer;
//! use sentiscope::history::{MemoryStorage, RecentHistoryStore};
//! use sentiscope::overview::Overview;
//! use sentiscope::predict::{PredictionClient, PredictionConfig};
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let history = Arc::new(RwLock::new(RecentHistoryStore::open(MemoryStorage::new())));
//!     let client = PredictionClient::new(PredictionConfig::new("http://localhost:8000"))?;
//!     let analyzer = Analyzer::new(Arc::new(client), Arc::clone(&history));
//!
//!     let outcome = analyzer.analyze_single("The update fixed everything").await?;
//!     println!("Sentiment: {}", outcome.prediction.sentiment);
//!
//!     let overview = Overview::from_records(history.read().await.list());
//!     println!("{} analyses recorded", overview.total);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod history;
pub mod logging;
pub mod overview;
pub mod predict;

// Re-export top-level types for convenience
pub use history::{
    AnalysisRecord, FileStorage, HistoryError, HistoryResult, HistoryStorage, MemoryStorage,
    NewAnalysis, RecentHistoryStore, Sentiment, Source, HISTORY_CAPACITY,
};

pub use predict::{
    LabeledText, PredictError, Prediction, PredictionClient, PredictionConfig, RedditPost,
    SentimentApi,
};

pub use analysis::{AnalysisError, Analyzer, SharedHistory};

pub use overview::{Overview, SentimentCounts, SourceBreakdown};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
