//! Prediction Service Integration
//!
//! Talks to the external sentiment-classification service. The service owns
//! the model, the CSV parsing and the social-media search; this module only
//! sends requests and validates the labels that come back.
//!
//! ## Endpoints
//!
//! - `POST /predict` - classify one text
//! - `POST /batch` - classify every row of an uploaded CSV file
//! - `GET /reddit/{query}?limit=N` - search and classify Reddit post titles
//! - `GET /twitter/{query}?limit=N` - search and classify tweets

mod client;
mod types;

pub use client::{PredictError, PredictionClient, PredictionConfig};
pub use types::{LabeledText, Prediction, RedditPost};

use async_trait::async_trait;

/// The operations the analysis views need from the prediction service
#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Classify a single text
    async fn predict(&self, text: &str) -> Result<Prediction, PredictError>;

    /// Upload a CSV file and classify each row of its `text` column
    async fn analyze_batch(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<LabeledText>, PredictError>;

    /// Search Reddit and classify the post titles
    async fn search_reddit(&self, query: &str, limit: u32) -> Result<Vec<RedditPost>, PredictError>;

    /// Search Twitter and classify the tweets
    async fn search_twitter(&self, query: &str, limit: u32) -> Result<Vec<LabeledText>, PredictError>;

    /// Check whether the service is reachable
    async fn health_check(&self) -> Result<(), PredictError>;
}
