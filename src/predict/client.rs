//! Prediction service REST client
//!
//! HTTP client for the external sentiment-classification service.

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::predict::types::{
    LabeledText, Prediction, PredictRequest, PredictResponse, RedditPost, ResultsResponse,
    WireLabeledText, WireRedditPost,
};
use crate::predict::SentimentApi;

/// Configuration for the prediction client
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    /// Base URL of the service (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl PredictionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Prediction service client
pub struct PredictionClient {
    client: Client,
    config: PredictionConfig,
}

impl PredictionClient {
    /// Create a new client with the given configuration
    pub fn new(config: PredictionConfig) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn query_url(&self, platform: &str, query: &str, limit: u32) -> String {
        self.url(&format!(
            "/{}/{}?limit={}",
            platform,
            urlencoding::encode(query),
            limit
        ))
    }
}

#[async_trait]
impl SentimentApi for PredictionClient {
    async fn predict(&self, text: &str) -> Result<Prediction, PredictError> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(classify)?;

        let wire: PredictResponse = read_json(response).await?;
        Prediction::try_from(wire)
    }

    async fn analyze_batch(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<LabeledText>, PredictError> {
        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/batch"))
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let wire: ResultsResponse<WireLabeledText> = read_json(response).await?;
        wire.results.into_iter().map(LabeledText::try_from).collect()
    }

    async fn search_reddit(&self, query: &str, limit: u32) -> Result<Vec<RedditPost>, PredictError> {
        let response = self
            .client
            .get(self.query_url("reddit", query, limit))
            .send()
            .await
            .map_err(classify)?;

        let wire: ResultsResponse<WireRedditPost> = read_json(response).await?;
        wire.results.into_iter().map(RedditPost::try_from).collect()
    }

    async fn search_twitter(&self, query: &str, limit: u32) -> Result<Vec<LabeledText>, PredictError> {
        let response = self
            .client
            .get(self.query_url("twitter", query, limit))
            .send()
            .await
            .map_err(classify)?;

        let wire: ResultsResponse<WireLabeledText> = read_json(response).await?;
        wire.results.into_iter().map(LabeledText::try_from).collect()
    }

    async fn health_check(&self) -> Result<(), PredictError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PredictError::Unavailable)
        }
    }
}

fn classify(e: reqwest::Error) -> PredictError {
    if e.is_timeout() {
        PredictError::Timeout
    } else if e.is_connect() {
        PredictError::Unavailable
    } else {
        PredictError::Request(e)
    }
}

/// Decode a successful response, or turn an error status into `ApiError`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, PredictError> {
    let status = response.status();
    let body = response.text().await.map_err(classify)?;

    if !status.is_success() {
        return Err(PredictError::ApiError {
            status: status.as_u16(),
            message: error_detail(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| PredictError::Decode(e.to_string()))
}

/// Pull the `detail` field out of an error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the prediction service
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Prediction service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid sentiment label in response: {0}")]
    InvalidLabel(i64),

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Sentiment;
    use axum::{
        body::Bytes,
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> PredictionClient {
        PredictionClient::new(PredictionConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PredictionConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_query_url_encodes_query() {
        let client = client_for("http://localhost:8000/".to_string());
        assert_eq!(
            client.query_url("reddit", "rust & go", 5),
            "http://localhost:8000/reddit/rust%20%26%20go?limit=5"
        );
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail": "Text cannot be empty"}"#), "Text cannot be empty");
        assert_eq!(
            error_detail(r#"{"detail": {"error": "boom"}}"#),
            r#"{"error":"boom"}"#
        );
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_predict_accepts_probability_alias() {
        let router = Router::new().route(
            "/predict",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["text"], "great stuff");
                Json(json!({"sentiment": 2, "probability": [0.05, 0.05, 0.85, 0.05]}))
            }),
        );
        let client = client_for(spawn_backend(router).await);

        let prediction = client.predict("great stuff").await.unwrap();
        assert_eq!(prediction.sentiment, Sentiment::Positive);
        assert_eq!(prediction.probabilities, vec![0.05, 0.05, 0.85, 0.05]);
    }

    #[tokio::test]
    async fn test_predict_surfaces_api_error_detail() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Text cannot be empty"})),
                )
            }),
        );
        let client = client_for(spawn_backend(router).await);

        match client.predict(" ").await {
            Err(PredictError::ApiError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Text cannot be empty");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_predict_rejects_unknown_label() {
        let router = Router::new().route(
            "/predict",
            post(|| async { Json(json!({"sentiment": 7, "probabilities": []})) }),
        );
        let client = client_for(spawn_backend(router).await);

        assert!(matches!(
            client.predict("x").await,
            Err(PredictError::InvalidLabel(7))
        ));
    }

    #[tokio::test]
    async fn test_batch_uploads_file() {
        let router = Router::new().route(
            "/batch",
            post(|body: Bytes| async move {
                let raw = String::from_utf8_lossy(&body);
                assert!(raw.contains("name=\"file\""));
                assert!(raw.contains("filename=\"reviews.csv\""));
                assert!(raw.contains("text\nfine\nawful"));
                Json(json!({"results": [
                    {"text": "fine", "sentiment": 1},
                    {"text": "awful", "sentiment": 0}
                ]}))
            }),
        );
        let client = client_for(spawn_backend(router).await);

        let items = client
            .analyze_batch("reviews.csv", b"text\nfine\nawful".to_vec())
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "awful");
        assert_eq!(items[1].sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_reddit_query_and_limit() {
        let router = Router::new().route(
            "/reddit/:query",
            get(
                |Path(query): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                    Json(json!({"results": [{
                        "title": format!("{} ({})", query, params["limit"]),
                        "url": "https://reddit.com/r/rust/1",
                        "score": 42,
                        "subreddit": "rust",
                        "sentiment": 2,
                        "probabilities": [0.1, 0.1, 0.7, 0.1]
                    }]}))
                },
            ),
        );
        let client = client_for(spawn_backend(router).await);

        let posts = client.search_reddit("rust lang", 5).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "rust lang (5)");
        assert_eq!(posts[0].score, 42);
        assert_eq!(posts[0].subreddit.as_deref(), Some("rust"));
    }

    #[tokio::test]
    async fn test_twitter_empty_results() {
        let router = Router::new().route(
            "/twitter/:query",
            get(|| async { Json(json!({"results": []})) }),
        );
        let client = client_for(spawn_backend(router).await);

        assert!(client.search_twitter("nothing", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = Router::new().route(
            "/",
            get(|| async { Json(json!({"message": "Sentiment Analysis API is running"})) }),
        );
        let client = client_for(spawn_backend(router).await);
        client.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        assert!(matches!(
            client.predict("hello").await,
            Err(PredictError::Unavailable)
        ));
    }
}
