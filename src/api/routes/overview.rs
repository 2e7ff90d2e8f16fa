//! Overview Route
//!
//! - GET /api/v1/overview - Sentiment distribution and per-source breakdown

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::OverviewResponse;
use crate::api::state::AppState;
use crate::overview::Overview;

/// GET /api/v1/overview
pub async fn get_overview(State(state): State<Arc<AppState>>) -> Json<OverviewResponse> {
    let history = state.history().read().await;
    Json(Overview::from_records(history.list()).into())
}
