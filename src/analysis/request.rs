use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything needed to run one analysis. Fields are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    provider: String,
    #[serde(skip_serializing)]
    credential: Option<String>,
    model: String,
    log_path: PathBuf,
    additional_context: String,
}

impl AnalysisRequest {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            provider: provider.into(),
            credential: None,
            model: model.into(),
            log_path: log_path.into(),
            additional_context: String::new(),
        }
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_context(mut self, additional_context: impl Into<String>) -> Self {
        self.additional_context = additional_context.into();
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn additional_context(&self) -> &str {
        &self.additional_context
    }
}
