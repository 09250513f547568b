pub mod json;
pub mod markdown;
pub mod terminal;

use crate::parser::LogFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur during report generation
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Everything one analysis run produced, ready to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: PathBuf,
    pub format: LogFormat,
    pub provider: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,

    /// Completion text exactly as the model returned it
    pub raw_response: String,

    pub cleaned_response: String,

    /// Output of the refactor pass; `None` when it failed or was skipped
    pub formatted_response: Option<String>,
}

impl AnalysisReport {
    /// Text to show: the refactored Markdown, or the cleaned text as fallback
    pub fn body(&self) -> &str {
        self.formatted_response
            .as_deref()
            .unwrap_or(&self.cleaned_response)
    }

    pub fn is_fallback(&self) -> bool {
        self.formatted_response.is_none()
    }
}
