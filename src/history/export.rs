//! History export formats

use crate::history::error::{HistoryError, HistoryResult};
use crate::history::types::AnalysisRecord;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Render records in the given format, newest first
pub fn export(records: &[AnalysisRecord], format: ExportFormat) -> HistoryResult<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ExportFormat::Csv => to_csv(records),
    }
}

/// CSV with a header row; sentiment is written as its label
pub fn to_csv(records: &[AnalysisRecord]) -> HistoryResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "timestamp", "source", "sentiment", "text"])
        .map_err(csv_error)?;

    for record in records {
        let timestamp = record.timestamp.to_rfc3339();
        writer
            .write_record([
                record.id.as_str(),
                timestamp.as_str(),
                record.source.as_str(),
                record.sentiment.label(),
                record.text.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HistoryError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| HistoryError::Serialization(e.to_string()))
}

fn csv_error(err: csv::Error) -> HistoryError {
    HistoryError::Serialization(err.to_string())
}
