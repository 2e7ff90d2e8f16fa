//! Prediction results and their wire representations

use serde::{Deserialize, Serialize};

use crate::history::Sentiment;
use crate::predict::client::PredictError;

/// Classification of a single text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    /// Per-label confidence in ordinal order; empty if the service sent none
    pub probabilities: Vec<f64>,
}

/// A labeled text from a batch upload or a tweet search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledText {
    pub text: String,
    pub sentiment: Sentiment,
    pub probabilities: Vec<f64>,
}

/// A labeled Reddit post; the title is what gets classified
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedditPost {
    pub title: String,
    pub url: String,
    pub score: i64,
    pub subreddit: Option<String>,
    pub sentiment: Sentiment,
    pub probabilities: Vec<f64>,
}

// ============================================
// Wire DTOs
// ============================================

/// Confidence vector under either of the two field names the service uses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireProbabilities {
    #[serde(default)]
    probabilities: Option<Vec<f64>>,
    #[serde(default)]
    probability: Option<Vec<f64>>,
}

impl WireProbabilities {
    fn into_vec(self) -> Vec<f64> {
        self.probabilities.or(self.probability).unwrap_or_default()
    }
}

fn label(value: i64) -> Result<Sentiment, PredictError> {
    Sentiment::try_from(value).map_err(|_| PredictError::InvalidLabel(value))
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    sentiment: i64,
    #[serde(flatten)]
    probabilities: WireProbabilities,
}

impl TryFrom<PredictResponse> for Prediction {
    type Error = PredictError;

    fn try_from(wire: PredictResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            sentiment: label(wire.sentiment)?,
            probabilities: wire.probabilities.into_vec(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLabeledText {
    /// CSV cells may come back as numbers or null
    text: serde_json::Value,
    sentiment: i64,
    #[serde(flatten)]
    probabilities: WireProbabilities,
}

impl TryFrom<WireLabeledText> for LabeledText {
    type Error = PredictError;

    fn try_from(wire: WireLabeledText) -> Result<Self, Self::Error> {
        let text = match wire.text {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(Self {
            text,
            sentiment: label(wire.sentiment)?,
            probabilities: wire.probabilities.into_vec(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRedditPost {
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    subreddit: Option<String>,
    sentiment: i64,
    #[serde(flatten)]
    probabilities: WireProbabilities,
}

impl TryFrom<WireRedditPost> for RedditPost {
    type Error = PredictError;

    fn try_from(wire: WireRedditPost) -> Result<Self, Self::Error> {
        Ok(Self {
            title: wire.title,
            url: wire.url,
            score: wire.score,
            subreddit: wire.subreddit,
            sentiment: label(wire.sentiment)?,
            probabilities: wire.probabilities.into_vec(),
        })
    }
}
