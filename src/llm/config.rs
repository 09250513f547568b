use serde::{Deserialize, Serialize};
use std::env;

/// Default endpoint of a local Ollama service
pub const DEFAULT_OLLAMA_API_URL: &str = "http://localhost:11434/api";

/// Well-known port of the local Ollama service
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Sampling knobs sent with every hosted completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Temperature for creativity (0.0-2.0)
    pub temperature: f32,

    /// Maximum tokens for the completion
    pub max_tokens: u32,

    pub frequency_penalty: Option<f32>,

    pub presence_penalty: Option<f32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 1500,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }
}

/// Configuration of a single provider instance, built per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the local model service
    pub api_url: String,

    /// Bearer token for the local service, API key for the hosted API
    pub api_key: Option<String>,

    /// Optional API base URL for custom hosted endpoints
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub params: GenerationParams,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_OLLAMA_API_URL.to_string(),
            api_key: None,
            api_base: None,
            timeout_secs: 300,
            params: GenerationParams::default(),
        }
    }
}

impl ProviderConfig {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Process-wide LLM settings, loaded once and passed explicitly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Local service endpoint (OLLAMA_API_URL)
    pub ollama_api_url: String,

    /// Optional bearer token for the local service (OLLAMA_API_KEY)
    pub ollama_api_key: Option<String>,

    /// Hosted API key (OPENAI_API_KEY)
    pub openai_api_key: Option<String>,

    /// Optional hosted API base URL (OPENAI_API_BASE)
    pub openai_api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub params: GenerationParams,

    /// Enable debug logging of requests
    pub debug: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            ollama_api_url: DEFAULT_OLLAMA_API_URL.to_string(),
            ollama_api_key: None,
            openai_api_key: None,
            openai_api_base: None,
            timeout_secs: 300,
            params: GenerationParams::default(),
            debug: false,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_internal(true)
    }

    /// Load configuration from environment variables without reading `.env`
    #[cfg(test)]
    fn from_env_no_dotenv() -> Self {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Self {
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let mut config = Self::default();

        if let Ok(url) = env::var("OLLAMA_API_URL") {
            if !url.trim().is_empty() {
                config.ollama_api_url = url.trim_end_matches('/').to_string();
            }
        }

        config.ollama_api_key = non_empty_var("OLLAMA_API_KEY");
        config.openai_api_key = non_empty_var("OPENAI_API_KEY");
        config.openai_api_base = non_empty_var("OPENAI_API_BASE");

        if let Ok(timeout) = env::var("LLM_REQUEST_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse::<u64>() {
                config.timeout_secs = timeout_secs;
            }
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse::<u32>() {
                if tokens > 0 {
                    config.params.max_tokens = tokens;
                }
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse::<f32>() {
                if (0.0..=2.0).contains(&temp) {
                    config.params.temperature = temp;
                }
            }
        }

        config.params.frequency_penalty = penalty_var("LLM_FREQUENCY_PENALTY");
        config.params.presence_penalty = penalty_var("LLM_PRESENCE_PENALTY");

        if let Ok(debug) = env::var("LLM_DEBUG") {
            config.debug = debug.to_lowercase() == "true" || debug == "1";
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if reqwest::Url::parse(&self.ollama_api_url).is_err() {
            return Err(format!("Invalid Ollama API URL: {}", self.ollama_api_url));
        }

        if !(0.0..=2.0).contains(&self.params.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.params.temperature
            ));
        }

        if self.params.max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Build the configuration for the local service variant. Only the local
    /// token (OLLAMA_API_KEY or `--ollama-token`) is ever attached.
    pub fn ollama_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_url: self.ollama_api_url.clone(),
            api_key: self.ollama_api_key.clone(),
            api_base: None,
            timeout_secs: self.timeout_secs,
            params: self.params.clone(),
        }
    }

    /// Build the configuration for the hosted variant. The credential is taken
    /// as given so an empty one is rejected by the provider factory.
    pub fn openai_config(&self, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_url: self.ollama_api_url.clone(),
            api_key: api_key.map(str::to_string),
            api_base: self.openai_api_base.clone(),
            timeout_secs: self.timeout_secs,
            params: self.params.clone(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn penalty_var(name: &str) -> Option<f32> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .filter(|penalty| (-2.0..=2.0).contains(penalty))
}
