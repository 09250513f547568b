use crate::analysis::LogAnalyzer;
use crate::cli::commands::ModelsCommand;
use crate::cli::utils::spinner;
use crate::llm::management;
use crate::llm::LlmConfig;
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn handle_models_command(action: ModelsCommand) -> Result<()> {
    let mut config = LlmConfig::from_env();

    match action {
        ModelsCommand::List {
            provider,
            api_key,
            ollama_token,
        } => {
            if let Some(token) = ollama_token.filter(|t| !t.is_empty()) {
                config.ollama_api_key = Some(token);
            }
            let analyzer = LogAnalyzer::new(config);
            let backend = analyzer.resolve_provider(&provider, api_key.as_deref())?;

            let models = backend
                .list_models()
                .await
                .with_context(|| format!("Failed to list {} models", provider))?;

            if models.is_empty() {
                println!("No models available from {}", provider);
            } else {
                println!("{}", format!("Models available from {}:", provider).bright_white().bold());
                for model in models {
                    println!("  • {}", model.bright_cyan());
                }
            }
        }
        ModelsCommand::Pull { name } => {
            let progress = spinner(format!("Pulling {}", name));
            let result = management::pull_model(config.ollama_config(), &name).await;
            progress.finish_and_clear();

            let status = result.with_context(|| format!("Error pulling model {}", name))?;
            println!("{} {}: {}", "✓".bright_green(), name, status);
        }
    }

    Ok(())
}

pub async fn handle_serve_command(port: u16) -> Result<()> {
    let status = management::start_service(port).await;
    println!("{}", status);
    Ok(())
}
