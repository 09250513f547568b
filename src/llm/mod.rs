pub mod config;
pub mod management;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_server;

pub use config::{GenerationParams, LlmConfig, ProviderConfig};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{create_provider, create_provider_for, LlmError, LlmProvider, ProviderKind};
