//! Export Route
//!
//! - GET /api/v1/export?format=json|csv - Download the recent history

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::history::{export, ExportFormat};

/// GET /api/v1/export
pub async fn export_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format = ExportFormat::parse(&params.format).ok_or_else(|| {
        ApiError::Validation(format!("unsupported export format: {}", params.format))
    })?;

    let body = {
        let history = state.history().read().await;
        export(history.list(), format)?
    };

    let filename = format!(
        "sentiscope_history_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}
