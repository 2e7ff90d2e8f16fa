//! History error types

use thiserror::Error;

/// Errors produced by the history store and its input types
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Persisting the history failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of the history failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Sentiment ordinal outside 0-3
    #[error("Invalid sentiment ordinal: {0} (expected 0-3)")]
    InvalidSentiment(i64),

    /// Unknown source tag
    #[error("Invalid source: {0} (expected Single, Batch, Reddit or Twitter)")]
    InvalidSource(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization(err.to_string())
    }
}

/// Result type alias for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
