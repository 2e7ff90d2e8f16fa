//! Analysis Views
//!
//! Runs a submission against the prediction service and records the results
//! in the shared history. The network call is always awaited before the
//! history lock is taken, and each submission's items are recorded under a
//! single lock so they stay contiguous. Ordering between concurrent
//! submissions is not guaranteed.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::history::{HistoryError, NewAnalysis, RecentHistoryStore, Sentiment, Source};
use crate::overview::SentimentCounts;
use crate::predict::{LabeledText, PredictError, Prediction, RedditPost, SentimentApi};

/// History store shared between the analysis views and the readers
pub type SharedHistory = Arc<RwLock<RecentHistoryStore>>;

/// How many rows of a batch upload are copied into the history
pub const BATCH_HISTORY_LIMIT: usize = 10;

/// Default number of posts requested from a social search
pub const DEFAULT_QUERY_LIMIT: u32 = 30;

/// Outcome of a single-text analysis
#[derive(Debug, Clone, Serialize)]
pub struct SingleOutcome {
    pub text: String,
    pub prediction: Prediction,
}

/// Outcome of a batch upload
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub items: Vec<LabeledText>,
    pub counts: SentimentCounts,
    /// Number of items copied into the history
    pub recorded: usize,
}

/// Outcome of a Reddit search
#[derive(Debug, Clone, Serialize)]
pub struct RedditOutcome {
    pub query: String,
    pub posts: Vec<RedditPost>,
    pub counts: SentimentCounts,
}

/// Outcome of a Twitter search
#[derive(Debug, Clone, Serialize)]
pub struct TwitterOutcome {
    pub query: String,
    pub tweets: Vec<LabeledText>,
    pub counts: SentimentCounts,
}

/// Errors from an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please enter some text to analyze")]
    EmptyInput,

    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Prediction failed: {0}")]
    Predict(#[from] PredictError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Submits input to the prediction service and records what comes back
#[derive(Clone)]
pub struct Analyzer {
    api: Arc<dyn SentimentApi>,
    history: SharedHistory,
}

impl Analyzer {
    pub fn new(api: Arc<dyn SentimentApi>, history: SharedHistory) -> Self {
        Self { api, history }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    pub fn api(&self) -> &Arc<dyn SentimentApi> {
        &self.api
    }

    /// Classify one text and record it as `Single`
    pub async fn analyze_single(&self, text: &str) -> Result<SingleOutcome, AnalysisError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let prediction = self.api.predict(text).await?;
        tracing::info!(sentiment = %prediction.sentiment, "Single analysis complete");

        self.record(Source::Single, [(text.to_string(), prediction.sentiment)])
            .await?;

        Ok(SingleOutcome {
            text: text.to_string(),
            prediction,
        })
    }

    /// Upload a CSV file; only the first `BATCH_HISTORY_LIMIT` rows are recorded
    pub async fn analyze_batch(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<BatchOutcome, AnalysisError> {
        validate_csv_name(file_name)?;
        if contents.is_empty() {
            return Err(AnalysisError::InvalidFile(format!("{} is empty", file_name)));
        }

        let items = self.api.analyze_batch(file_name, contents).await?;
        let counts = SentimentCounts::from_labels(items.iter().map(|i| i.sentiment));
        tracing::info!(file = %file_name, rows = items.len(), "Batch analysis complete");

        let recorded = items.len().min(BATCH_HISTORY_LIMIT);
        self.record(
            Source::Batch,
            items
                .iter()
                .take(BATCH_HISTORY_LIMIT)
                .map(|i| (i.text.clone(), i.sentiment)),
        )
        .await?;

        Ok(BatchOutcome {
            items,
            counts,
            recorded,
        })
    }

    /// Read a CSV file from disk and upload it
    pub async fn analyze_batch_file(&self, path: &Path) -> Result<BatchOutcome, AnalysisError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        validate_csv_name(&file_name)?;

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisError::InvalidFile(format!("{}: {}", path.display(), e)))?;

        self.analyze_batch(&file_name, contents).await
    }

    /// Search Reddit and record every post title as `Reddit`
    pub async fn analyze_reddit(&self, query: &str, limit: u32) -> Result<RedditOutcome, AnalysisError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnalysisError::EmptyQuery);
        }

        let posts = self.api.search_reddit(query, limit).await?;
        let counts = SentimentCounts::from_labels(posts.iter().map(|p| p.sentiment));
        tracing::info!(query = %query, posts = posts.len(), "Reddit analysis complete");

        self.record(
            Source::Reddit,
            posts.iter().map(|p| (p.title.clone(), p.sentiment)),
        )
        .await?;

        Ok(RedditOutcome {
            query: query.to_string(),
            posts,
            counts,
        })
    }

    /// Search Twitter and record every tweet as `Twitter`
    pub async fn analyze_twitter(&self, query: &str, limit: u32) -> Result<TwitterOutcome, AnalysisError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnalysisError::EmptyQuery);
        }

        let tweets = self.api.search_twitter(query, limit).await?;
        let counts = SentimentCounts::from_labels(tweets.iter().map(|t| t.sentiment));
        tracing::info!(query = %query, tweets = tweets.len(), "Twitter analysis complete");

        self.record(
            Source::Twitter,
            tweets.iter().map(|t| (t.text.clone(), t.sentiment)),
        )
        .await?;

        Ok(TwitterOutcome {
            query: query.to_string(),
            tweets,
            counts,
        })
    }

    /// Add each item in order, under one write lock
    async fn record(
        &self,
        source: Source,
        items: impl IntoIterator<Item = (String, Sentiment)>,
    ) -> Result<(), HistoryError> {
        let mut history = self.history.write().await;
        for (text, sentiment) in items {
            history.add(NewAnalysis::new(text, sentiment, source))?;
        }
        Ok(())
    }
}

fn validate_csv_name(file_name: &str) -> Result<(), AnalysisError> {
    let is_csv = Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Ok(())
    } else {
        Err(AnalysisError::InvalidFile(format!(
            "{} is not a CSV file",
            file_name
        )))
    }
}
