use crate::llm::config::{GenerationParams, ProviderConfig};
use crate::llm::provider::{LlmError, LlmProvider};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateCompletionRequest,
        CreateCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Model ids starting with one of these go to the chat endpoint
pub const CHAT_MODEL_PREFIXES: &[&str] = &["gpt-", "chatgpt-"];

/// Whether a model id is served by the chat completions endpoint
pub fn is_chat_model(model: &str) -> bool {
    CHAT_MODEL_PREFIXES
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

/// Provider backed by the hosted OpenAI API
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    params: GenerationParams,
    timeout_secs: u64,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential("OpenAI".to_string()))?;

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = &config.api_base {
            openai_config = openai_config.with_api_base(api_base);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            params: config.params,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Prompt text actually sent to the hosted model
    pub fn full_prompt(prompt: &str, additional_context: &str) -> String {
        format!("{}\nAdditional Context: {}", prompt, additional_context)
    }

    fn chat_request(&self, model: &str, prompt: String) -> Result<CreateChatCompletionRequest, LlmError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map(ChatCompletionRequestMessage::User)
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(model)
            .messages(vec![message])
            .temperature(self.params.temperature)
            .max_completion_tokens(self.params.max_tokens);

        if let Some(penalty) = self.params.frequency_penalty {
            request_builder.frequency_penalty(penalty);
        }
        if let Some(penalty) = self.params.presence_penalty {
            request_builder.presence_penalty(penalty);
        }

        request_builder
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))
    }

    fn completion_request(&self, model: &str, prompt: String) -> Result<CreateCompletionRequest, LlmError> {
        let mut request_builder = CreateCompletionRequestArgs::default();
        request_builder
            .model(model)
            .prompt(prompt)
            .temperature(self.params.temperature)
            .max_tokens(self.params.max_tokens);

        if let Some(penalty) = self.params.frequency_penalty {
            request_builder.frequency_penalty(penalty);
        }
        if let Some(penalty) = self.params.presence_penalty {
            request_builder.presence_penalty(penalty);
        }

        request_builder
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T, LlmError>
    where
        F: Future<Output = Result<T, OpenAIError>>,
    {
        tokio::time::timeout(Duration::from_secs(self.timeout_secs), call)
            .await
            .map_err(|_| LlmError::Timeout(self.timeout_secs))?
            .map_err(|e| LlmError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self.with_timeout(self.client.models().list()).await?;
        Ok(response.data.into_iter().map(|model| model.id).collect())
    }

    async fn send_prompt(
        &self,
        model: &str,
        prompt: &str,
        additional_context: &str,
    ) -> Result<String, LlmError> {
        let full_prompt = Self::full_prompt(prompt, additional_context);

        if is_chat_model(model) {
            debug!("Sending chat completion request: model={}", model);
            let request = self.chat_request(model, full_prompt)?;
            let response = self.with_timeout(self.client.chat().create(request)).await?;

            response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or(LlmError::EmptyResponse)
        } else {
            debug!("Sending legacy completion request: model={}", model);
            let request = self.completion_request(model, full_prompt)?;
            let response = self.with_timeout(self.client.completions().create(request)).await?;

            response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.text)
                .ok_or(LlmError::EmptyResponse)
        }
    }
}
