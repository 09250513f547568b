use super::request::AnalysisRequest;
use super::{AnalysisError, AnalysisResult};
use crate::llm::prompts::security_analysis_prompt;
use crate::llm::{create_provider_for, LlmConfig, LlmError, LlmProvider, ProviderKind};
use crate::parser::LogDocument;
use tracing::{debug, error, info};

/// Runs the parse -> prompt -> dispatch pipeline for a single log file
pub struct LogAnalyzer {
    config: LlmConfig,
}

impl LogAnalyzer {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Resolve a provider by name. The credential belongs to the hosted variant
    /// and is never forwarded to the local service.
    pub fn resolve_provider(
        &self,
        provider: &str,
        credential: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, LlmError> {
        let kind: ProviderKind = provider.parse()?;
        let provider_config = match kind {
            ProviderKind::Ollama => self.config.ollama_config(),
            ProviderKind::OpenAi => self.config.openai_config(credential),
        };
        create_provider_for(kind, provider_config)
    }

    /// Run the analysis; `None` means the analysis is unavailable and the
    /// cause has been logged.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Option<String> {
        match self.try_analyze(request).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    pub async fn try_analyze(&self, request: &AnalysisRequest) -> AnalysisResult<String> {
        let document = self.load_document(request)?;
        self.analyze_document(request, &document).await
    }

    /// Check the path and parse the log, rejecting missing or empty input
    pub fn load_document(&self, request: &AnalysisRequest) -> AnalysisResult<LogDocument> {
        info!("Starting log analysis...");

        let path = request.log_path();
        if !path.exists() {
            return Err(AnalysisError::FileNotFound(path.to_path_buf()));
        }

        let document = LogDocument::load(path);
        if document.is_empty() {
            return Err(AnalysisError::UnreadableOrEmptyLog(path.to_path_buf()));
        }

        debug!(
            "Parsed {} as {} ({} chars)",
            path.display(),
            document.format,
            document.content.len()
        );
        Ok(document)
    }

    /// Build the prompt for an already parsed document and dispatch it
    pub async fn analyze_document(
        &self,
        request: &AnalysisRequest,
        document: &LogDocument,
    ) -> AnalysisResult<String> {
        let prompt = security_analysis_prompt(&document.content, request.additional_context());
        info!("Constructed prompt for LLM.");

        let provider = self.resolve_provider(request.provider(), request.credential())?;

        let response = provider.send_prompt(request.model(), &prompt, "").await?;
        info!("LLM response received successfully.");

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_server::serve_once;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::{Builder, NamedTempFile};
    use tokio::net::TcpListener;

    fn log_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn analyzer_for(url: &str) -> LogAnalyzer {
        LogAnalyzer::new(LlmConfig {
            ollama_api_url: url.to_string(),
            ..Default::default()
        })
    }

    async fn assert_no_connection(listener: &TcpListener) {
        let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "expected no network call");
    }

    #[tokio::test]
    async fn test_missing_file_returns_none_without_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let analyzer = analyzer_for(&format!("http://{}/api", listener.local_addr().unwrap()));
        let request = AnalysisRequest::new("Ollama", "llama3.2", "/nonexistent/auth.csv");

        assert!(analyzer.analyze(&request).await.is_none());
        assert!(matches!(
            analyzer.try_analyze(&request).await,
            Err(AnalysisError::FileNotFound(_))
        ));
        assert_no_connection(&listener).await;
    }

    #[tokio::test]
    async fn test_empty_log_returns_none() {
        let file = log_file(".txt", "");
        let analyzer = LogAnalyzer::new(LlmConfig::default());
        let request = AnalysisRequest::new("Ollama", "llama3.2", file.path());

        assert!(matches!(
            analyzer.try_analyze(&request).await,
            Err(AnalysisError::UnreadableOrEmptyLog(_))
        ));
    }

    #[tokio::test]
    async fn test_openai_without_credential_fails_fast() {
        let file = log_file(".csv", "2024-01-01,sshd,Failed password\n");
        let analyzer = LogAnalyzer::new(LlmConfig {
            openai_api_key: Some("sk-from-env".to_string()),
            openai_api_base: Some("http://127.0.0.1:9/v1".to_string()),
            ..Default::default()
        });

        for credential in [None, Some(String::new())] {
            let request = AnalysisRequest::new("OpenAI", "gpt-4", file.path())
                .with_credential(credential);

            assert!(matches!(
                analyzer.try_analyze(&request).await,
                Err(AnalysisError::MissingCredential(_))
            ));
            assert!(analyzer.analyze(&request).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let file = log_file(".log", "kernel: segfault");
        let analyzer = LogAnalyzer::new(LlmConfig::default());
        let request = AnalysisRequest::new("mistral", "m", file.path());

        assert!(matches!(
            analyzer.try_analyze(&request).await,
            Err(AnalysisError::UnsupportedProvider(_))
        ));
    }

    #[tokio::test]
    async fn test_analysis_sends_logs_and_context() {
        let file = log_file(".csv", "2024-01-01,sshd,Failed password for root\n");
        let (url, server) = serve_once(200, "{\"response\":\"## Summary\"}\n{\"response\":\"- brute force\"}\n").await;
        let analyzer = analyzer_for(&url);
        let request = AnalysisRequest::new("ollama", "llama3.2", file.path())
            .with_context("internet-facing bastion");

        let response = analyzer.analyze(&request).await;
        assert_eq!(response.as_deref(), Some("## Summary\n- brute force"));

        let captured = server.await.unwrap();
        let payload: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        let prompt = payload["prompt"].as_str().unwrap();
        assert!(prompt.contains("detailed security analysis"));
        assert!(prompt.contains("2024-01-01 sshd Failed password for root"));
        assert!(prompt.contains("internet-facing bastion"));
        assert_eq!(payload["model"], "llama3.2");
    }

    #[tokio::test]
    async fn test_remote_failure_returns_none() {
        let file = log_file(".log", "kernel: segfault");
        let (url, _server) = serve_once(500, "boom").await;
        let analyzer = analyzer_for(&url);
        let request = AnalysisRequest::new("Ollama", "llama3.2", file.path());

        assert!(analyzer.analyze(&request).await.is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_status() {
        let file = log_file(".log", "kernel: segfault");
        let (url, _server) = serve_once(503, "loading model").await;
        let analyzer = analyzer_for(&url);
        let request = AnalysisRequest::new("Ollama", "llama3.2", file.path());

        let err = analyzer.try_analyze(&request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::RemoteCallFailure(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_hosted_key_never_reaches_local_service() {
        let file = log_file(".log", "sshd: Failed password for root");
        let (url, server) = serve_once(200, "{\"response\":\"ok\"}\n").await;
        let analyzer = LogAnalyzer::new(LlmConfig {
            ollama_api_url: url,
            openai_api_key: Some("sk-live-SECRET".to_string()),
            ..Default::default()
        });
        let request = AnalysisRequest::new("ollama", "llama3.2", file.path())
            .with_credential(Some("sk-live-SECRET".to_string()));

        assert_eq!(analyzer.analyze(&request).await.as_deref(), Some("ok"));

        let captured = server.await.unwrap();
        assert_eq!(captured.header("authorization"), None);
        assert!(!captured.head.contains("sk-live-SECRET"));
    }

    #[tokio::test]
    async fn test_local_token_is_sent_to_local_service() {
        let file = log_file(".log", "sshd: Failed password for root");
        let (url, server) = serve_once(200, "{\"response\":\"ok\"}\n").await;
        let analyzer = LogAnalyzer::new(LlmConfig {
            ollama_api_url: url,
            ollama_api_key: Some("local-token".to_string()),
            ..Default::default()
        });
        let request = AnalysisRequest::new("Ollama", "llama3.2", file.path())
            .with_credential(Some("sk-live-SECRET".to_string()));

        assert!(analyzer.analyze(&request).await.is_some());

        let captured = server.await.unwrap();
        assert_eq!(
            captured.header("authorization").as_deref(),
            Some("Bearer local-token")
        );
    }
}
