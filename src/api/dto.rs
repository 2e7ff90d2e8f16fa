//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{AnalysisRecord, Sentiment, Source};
use crate::overview::{format_relative_time, Overview, SentimentCounts, SourceBreakdown};

// ============================================
// HISTORY DTOs
// ============================================

/// One history entry as shown in the recent analyses list
#[derive(Debug, Serialize)]
pub struct RecordDto {
    pub id: String,
    pub text: String,
    /// Ordinal 0-3
    pub sentiment: Sentiment,
    pub sentiment_label: &'static str,
    pub source: Source,
    pub timestamp: DateTime<Utc>,
    /// e.g. "5 minutes ago"
    pub age: String,
}

impl RecordDto {
    pub fn from_record(record: &AnalysisRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            sentiment: record.sentiment,
            sentiment_label: record.sentiment.label(),
            source: record.source,
            timestamp: record.timestamp,
            age: format_relative_time(record.timestamp, now),
        }
    }
}

/// Recent history listing
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Newest first
    pub records: Vec<RecordDto>,
    pub count: usize,
    pub capacity: usize,
}

// ============================================
// OVERVIEW DTOs
// ============================================

/// Percentage of each label
#[derive(Debug, Serialize)]
pub struct Percentages {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub irrelevant: f64,
}

impl From<&SentimentCounts> for Percentages {
    fn from(counts: &SentimentCounts) -> Self {
        let round = |label| (counts.percentage(label) * 10.0).round() / 10.0;
        Self {
            negative: round(Sentiment::Negative),
            neutral: round(Sentiment::Neutral),
            positive: round(Sentiment::Positive),
            irrelevant: round(Sentiment::Irrelevant),
        }
    }
}

/// Aggregate counts over the recent history
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub total: usize,
    pub distribution: SentimentCounts,
    pub percentages: Percentages,
    pub dominant: Option<&'static str>,
    pub by_source: SourceBreakdown,
}

impl From<Overview> for OverviewResponse {
    fn from(overview: Overview) -> Self {
        Self {
            total: overview.total,
            percentages: Percentages::from(&overview.distribution),
            dominant: overview.distribution.dominant().map(Sentiment::label),
            distribution: overview.distribution,
            by_source: overview.by_source,
        }
    }
}

// ============================================
// ANALYSIS DTOs
// ============================================

/// Single text analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

/// Batch upload parameters; the CSV itself is the request body
#[derive(Debug, Deserialize)]
pub struct BatchParams {
    #[serde(default = "default_batch_name")]
    pub file_name: String,
}

fn default_batch_name() -> String {
    "upload.csv".to_string()
}

/// Social search parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "json".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "ok" or "unavailable"
    pub prediction_service: String,
    pub history_records: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
