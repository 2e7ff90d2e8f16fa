//! Sentiment aggregation for the overview charts
//!
//! Counts labels across a set of records: the overall distribution (pie
//! chart) and a per-source breakdown (stacked bar chart).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::{AnalysisRecord, Sentiment, Source};

/// Count of each sentiment label, indexed by ordinal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
    pub irrelevant: usize,
}

impl SentimentCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally an iterator of labels
    pub fn from_labels(labels: impl IntoIterator<Item = Sentiment>) -> Self {
        let mut counts = Self::new();
        for label in labels {
            counts.record(label);
        }
        counts
    }

    pub fn record(&mut self, label: Sentiment) {
        *self.slot_mut(label) += 1;
    }

    pub fn get(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
            Sentiment::Positive => self.positive,
            Sentiment::Irrelevant => self.irrelevant,
        }
    }

    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive + self.irrelevant
    }

    /// Share of `label` in percent, 0.0 when nothing was counted
    pub fn percentage(&self, label: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(label) as f64 * 100.0 / total as f64
    }

    /// Most frequent label; ties go to the lower ordinal
    pub fn dominant(&self) -> Option<Sentiment> {
        if self.total() == 0 {
            return None;
        }
        Sentiment::ALL
            .iter()
            .copied()
            .fold(None, |best: Option<Sentiment>, label| match best {
                Some(b) if self.get(b) >= self.get(label) => Some(b),
                _ => Some(label),
            })
    }

    /// Counts in ordinal order
    pub fn as_array(&self) -> [usize; 4] {
        [self.negative, self.neutral, self.positive, self.irrelevant]
    }

    fn slot_mut(&mut self, label: Sentiment) -> &mut usize {
        match label {
            Sentiment::Negative => &mut self.negative,
            Sentiment::Neutral => &mut self.neutral,
            Sentiment::Positive => &mut self.positive,
            Sentiment::Irrelevant => &mut self.irrelevant,
        }
    }
}

/// Sentiment counts broken down by source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceBreakdown {
    pub single: SentimentCounts,
    pub batch: SentimentCounts,
    pub reddit: SentimentCounts,
    pub twitter: SentimentCounts,
}

impl SourceBreakdown {
    pub fn record(&mut self, source: Source, label: Sentiment) {
        self.slot_mut(source).record(label);
    }

    pub fn get(&self, source: Source) -> &SentimentCounts {
        match source {
            Source::Single => &self.single,
            Source::Batch => &self.batch,
            Source::Reddit => &self.reddit,
            Source::Twitter => &self.twitter,
        }
    }

    /// One series per label, one value per source (stacked bar layout)
    pub fn series(&self, label: Sentiment) -> [usize; 4] {
        Source::ALL.map(|source| self.get(source).get(label))
    }

    fn slot_mut(&mut self, source: Source) -> &mut SentimentCounts {
        match source {
            Source::Single => &mut self.single,
            Source::Batch => &mut self.batch,
            Source::Reddit => &mut self.reddit,
            Source::Twitter => &mut self.twitter,
        }
    }
}

/// Aggregate view over the recent history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total: usize,
    pub distribution: SentimentCounts,
    pub by_source: SourceBreakdown,
}

impl Overview {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut overview = Self::default();
        for record in records {
            overview.distribution.record(record.sentiment);
            overview.by_source.record(record.source, record.sentiment);
        }
        overview.total = records.len();
        overview
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Human-readable age of `then` relative to `now`, e.g. "3 minutes ago"
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        return format!("{} seconds ago", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }

    let days = hours / 24;
    format!("{} day{} ago", days, plural(days))
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
