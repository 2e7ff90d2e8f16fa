//! Core data types for the analysis history
//!
//! - `Sentiment`: the four labels returned by the classifier, stored as ordinals
//! - `Source`: which analysis view produced a record
//! - `AnalysisRecord`: one stored outcome
//! - `NewAnalysis`: insertion input, before an id and timestamp are assigned

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::history::error::HistoryError;

/// Sentiment label, encoded on the wire and on disk as an ordinal 0-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
    Irrelevant,
}

impl Sentiment {
    /// All labels in ordinal order
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Positive,
        Sentiment::Irrelevant,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
            Sentiment::Irrelevant => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
            Sentiment::Irrelevant => "Irrelevant",
        }
    }
}

impl TryFrom<u8> for Sentiment {
    type Error = HistoryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Sentiment::Negative),
            1 => Ok(Sentiment::Neutral),
            2 => Ok(Sentiment::Positive),
            3 => Ok(Sentiment::Irrelevant),
            other => Err(HistoryError::InvalidSentiment(other as i64)),
        }
    }
}

impl TryFrom<i64> for Sentiment {
    type Error = HistoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| HistoryError::InvalidSentiment(value))
            .and_then(Sentiment::try_from)
    }
}

impl From<Sentiment> for u8 {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.ordinal()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Origin tag for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    Single,
    Batch,
    Reddit,
    Twitter,
}

impl Source {
    pub const ALL: [Source; 4] = [Source::Single, Source::Batch, Source::Reddit, Source::Twitter];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Single => "Single",
            Source::Batch => "Batch",
            Source::Reddit => "Reddit",
            Source::Twitter => "Twitter",
        }
    }
}

impl FromStr for Source {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" | "single" => Ok(Source::Single),
            "Batch" | "batch" => Ok(Source::Batch),
            "Reddit" | "reddit" => Ok(Source::Reddit),
            "Twitter" | "twitter" => Ok(Source::Twitter),
            other => Err(HistoryError::InvalidSource(other.to_string())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A stored analysis outcome
///
/// Records are immutable once inserted. The timestamp serializes as RFC 3339
/// with full sub-second precision, so a save/load cycle is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub source: Source,
    pub timestamp: DateTime<Utc>,
}

/// Input for `RecentHistoryStore::add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalysis {
    pub text: String,
    pub sentiment: Sentiment,
    pub source: Source,
}

impl NewAnalysis {
    pub fn new(text: impl Into<String>, sentiment: Sentiment, source: Source) -> Self {
        Self {
            text: text.into(),
            sentiment,
            source,
        }
    }
}
