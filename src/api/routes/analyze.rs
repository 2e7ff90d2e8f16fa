//! Analysis Routes
//!
//! Each route forwards to the prediction service and records the results in
//! the recent history before responding.
//!
//! - POST /api/v1/analyze/single - `{"text": "..."}`
//! - POST /api/v1/analyze/batch?file_name=reviews.csv - raw CSV body
//! - GET /api/v1/analyze/reddit/:query?limit=N
//! - GET /api/v1/analyze/twitter/:query?limit=N

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::analysis::{BatchOutcome, RedditOutcome, SingleOutcome, TwitterOutcome};
use crate::api::dto::{AnalyzeTextRequest, BatchParams, SearchParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// POST /api/v1/analyze/single
pub async fn analyze_single(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeTextRequest>,
) -> ApiResult<Json<SingleOutcome>> {
    let outcome = state.analyzer.analyze_single(&request.text).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/analyze/batch
pub async fn analyze_batch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BatchParams>,
    body: Bytes,
) -> ApiResult<Json<BatchOutcome>> {
    let outcome = state
        .analyzer
        .analyze_batch(&params.file_name, body.to_vec())
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/analyze/reddit/:query
pub async fn analyze_reddit(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<RedditOutcome>> {
    let limit = params.limit.unwrap_or(state.config.default_query_limit);
    let outcome = state.analyzer.analyze_reddit(&query, limit).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/analyze/twitter/:query
pub async fn analyze_twitter(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<TwitterOutcome>> {
    let limit = params.limit.unwrap_or(state.config.default_query_limit);
    let outcome = state.analyzer.analyze_twitter(&query, limit).await?;
    Ok(Json(outcome))
}
