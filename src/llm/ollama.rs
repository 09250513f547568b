use crate::llm::config::ProviderConfig;
use crate::llm::provider::{LlmError, LlmProvider};
use crate::llm::stream::collect_fragments;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const PROVIDER_NAME: &str = "Ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    additional_context: &'a str,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Provider backed by a locally hosted Ollama service
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(LlmError::RemoteStatus {
            provider: PROVIDER_NAME.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// Download a model into the local service, returning its final status
    pub async fn pull_model(&self, model: &str) -> Result<String, LlmError> {
        info!("Pulling model {} from {}", model, self.api_url);

        let request = self
            .client
            .post(self.endpoint("pull"))
            .json(&PullRequest { model, stream: false });
        let response = Self::ensure_success(self.authorize(request).send().await?).await?;

        let pulled: PullResponse = response.json().await?;
        Ok(pulled.status.unwrap_or_else(|| "success".to_string()))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let request = self.client.get(self.endpoint("tags"));
        let response = Self::ensure_success(self.authorize(request).send().await?).await?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .into_iter()
            .filter_map(|entry| entry.model.or(entry.name))
            .collect())
    }

    async fn send_prompt(
        &self,
        model: &str,
        prompt: &str,
        additional_context: &str,
    ) -> Result<String, LlmError> {
        debug!(
            "Sending prompt to Ollama: model={}, prompt_chars={}",
            model,
            prompt.len()
        );

        let payload = GenerateRequest {
            model,
            prompt,
            additional_context,
        };
        let request = self.client.post(self.endpoint("generate")).json(&payload);
        let response = Self::ensure_success(self.authorize(request).send().await?).await?;

        let text = collect_fragments(response.bytes_stream()).await?;
        debug!("Received response: {} chars", text.len());

        Ok(text)
    }
}
