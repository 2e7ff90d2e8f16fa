//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::history::HistoryError;
use crate::predict::PredictError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Prediction service call failed
    #[error("Prediction service error: {0}")]
    Upstream(#[from] PredictError),

    /// History persistence failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyInput | AnalysisError::EmptyQuery | AnalysisError::InvalidFile(_) => {
                ApiError::Validation(err.to_string())
            }
            AnalysisError::Predict(e) => ApiError::Upstream(e),
            AnalysisError::History(e) => ApiError::History(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Upstream(e) => match e {
                PredictError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "PREDICTION_TIMEOUT"),
                PredictError::Unavailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, "PREDICTION_UNAVAILABLE")
                }
                PredictError::ApiError { status, .. } if *status == 400 || *status == 404 => {
                    (StatusCode::BAD_REQUEST, "PREDICTION_REJECTED")
                }
                _ => (StatusCode::BAD_GATEWAY, "PREDICTION_ERROR"),
            },
            ApiError::History(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HISTORY_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
