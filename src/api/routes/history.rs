//! History Routes
//!
//! - GET /api/v1/history - Recent analyses, newest first
//! - GET /api/v1/history/:id - One record
//! - DELETE /api/v1/history - Clear the history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{HistoryResponse, RecordDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::history::HISTORY_CAPACITY;

/// GET /api/v1/history
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    let history = state.history().read().await;
    let now = Utc::now();

    let records: Vec<RecordDto> = history
        .list()
        .iter()
        .map(|r| RecordDto::from_record(r, now))
        .collect();

    Json(HistoryResponse {
        count: records.len(),
        records,
        capacity: HISTORY_CAPACITY,
    })
}

/// GET /api/v1/history/:id
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecordDto>> {
    let history = state.history().read().await;
    let record = history
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("analysis {}", id)))?;

    Ok(Json(RecordDto::from_record(record, Utc::now())))
}

/// DELETE /api/v1/history
pub async fn clear_history(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.history().write().await.clear()?;
    Ok(StatusCode::NO_CONTENT)
}
