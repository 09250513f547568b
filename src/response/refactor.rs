use crate::analysis::LogAnalyzer;
use crate::llm::prompts::refactor_prompt;
use tracing::{error, info};

/// Ask the model to reshape cleaned output into structured Markdown.
/// Returns `None` on any failure so the caller can show the cleaned text.
pub async fn refactor_response(
    analyzer: &LogAnalyzer,
    provider: &str,
    credential: Option<&str>,
    model: &str,
    cleaned_text: &str,
) -> Option<String> {
    let provider = match analyzer.resolve_provider(provider, credential) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Error during LLM call: {}", e);
            return None;
        }
    };

    info!("Cleaning the response for readability...");
    match provider
        .send_prompt(model, &refactor_prompt(cleaned_text), "")
        .await
    {
        Ok(refactored) if !refactored.trim().is_empty() => Some(refactored),
        Ok(_) => {
            error!("Refactor pass returned an empty response");
            None
        }
        Err(e) => {
            error!("Error during LLM call: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_server::serve_once;
    use crate::llm::LlmConfig;

    fn analyzer_for(url: &str) -> LogAnalyzer {
        LogAnalyzer::new(LlmConfig {
            ollama_api_url: url.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_refactor_returns_model_output() {
        let body = "{\"response\":\"# Report\"}\n{\"response\":\"\"}\n{\"response\":\"- finding\"}\n";
        let (url, server) = serve_once(200, body).await;

        let refactored = refactor_response(&analyzer_for(&url), "Ollama", None, "llama3.2", "# Report\n- finding").await;
        assert_eq!(refactored.as_deref(), Some("# Report\n\n- finding"));

        let captured = server.await.unwrap();
        let payload: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        let prompt = payload["prompt"].as_str().unwrap();
        assert!(prompt.starts_with("Please refactor"));
        assert!(prompt.ends_with("# Report\n- finding"));
    }

    #[tokio::test]
    async fn test_refactor_failure_is_none() {
        let (url, _server) = serve_once(500, "internal error").await;

        let refactored = refactor_response(&analyzer_for(&url), "ollama", None, "llama3.2", "text").await;
        assert!(refactored.is_none());
    }

    #[tokio::test]
    async fn test_refactor_empty_output_is_none() {
        let (url, _server) = serve_once(200, "{\"response\":\"  \"}\n").await;

        let refactored = refactor_response(&analyzer_for(&url), "ollama", None, "llama3.2", "text").await;
        assert!(refactored.is_none());
    }

    #[tokio::test]
    async fn test_refactor_hosted_without_key_is_none() {
        let analyzer = LogAnalyzer::new(LlmConfig::default());

        let refactored = refactor_response(&analyzer, "OpenAI", Some(""), "gpt-4", "text").await;
        assert!(refactored.is_none());
    }
}
