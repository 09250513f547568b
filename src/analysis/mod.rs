pub mod executor;
pub mod request;

pub use executor::LogAnalyzer;
pub use request::AnalysisRequest;

use crate::llm::LlmError;
use std::path::PathBuf;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Reasons an analysis produced no result
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Log file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No log contents could be read from {}", .0.display())]
    UnreadableOrEmptyLog(PathBuf),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("{0} API key is required")]
    MissingCredential(String),

    #[error("Error during LLM call: {0}")]
    RemoteCallFailure(#[source] LlmError),
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::UnsupportedProvider(name) => AnalysisError::UnsupportedProvider(name),
            LlmError::MissingCredential(provider) => AnalysisError::MissingCredential(provider),
            other => AnalysisError::RemoteCallFailure(other),
        }
    }
}
