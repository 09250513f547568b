use crate::llm::config::ProviderConfig;
use crate::llm::ollama::OllamaProvider;
use crate::llm::openai::OpenAiProvider;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while talking to a model backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("{0} API key is required")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{provider} API error: {status} {body}")]
    RemoteStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Model returned no completion")]
    EmptyResponse,
}

/// The two kinds of backend a request can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    OpenAi,
}

impl ProviderKind {
    pub fn requires_credential(&self) -> bool {
        matches!(self, ProviderKind::OpenAi)
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(LlmError::UnsupportedProvider(name.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "Ollama"),
            ProviderKind::OpenAi => write!(f, "OpenAI"),
        }
    }
}

/// Capability set shared by every model backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider name
    fn name(&self) -> &'static str;

    /// List model identifiers the backend can serve
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Submit a prompt and return the completion text
    async fn send_prompt(
        &self,
        model: &str,
        prompt: &str,
        additional_context: &str,
    ) -> Result<String, LlmError>;
}

/// Resolve a provider name (case-insensitive) into a concrete backend
pub fn create_provider(name: &str, config: ProviderConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let kind: ProviderKind = name.parse()?;
    create_provider_for(kind, config)
}

pub fn create_provider_for(
    kind: ProviderKind,
    config: ProviderConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match kind {
        ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(config)?)),
        ProviderKind::OpenAi => {
            let has_key = config.api_key.as_deref().is_some_and(|key| !key.trim().is_empty());
            if !has_key {
                return Err(LlmError::MissingCredential(kind.to_string()));
            }
            Ok(Box::new(OpenAiProvider::new(config)?))
        }
    }
}
