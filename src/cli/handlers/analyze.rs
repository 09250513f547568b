use crate::analysis::{AnalysisRequest, LogAnalyzer};
use crate::cli::commands::{AnalyzeArgs, ReportFormat};
use crate::cli::utils::spinner;
use crate::llm::LlmConfig;
use crate::report::json::JsonReporter;
use crate::report::markdown::MarkdownReporter;
use crate::report::terminal::TerminalReporter;
use crate::report::AnalysisReport;
use crate::response::{clean_response, refactor_response};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

const PREVIEW_LINES: usize = 20;

pub async fn handle_analyze_command(args: AnalyzeArgs) -> Result<()> {
    let mut config = LlmConfig::from_env();
    if let Some(api_url) = &args.api_url {
        config.ollama_api_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(token) = args.ollama_token.as_deref().filter(|t| !t.is_empty()) {
        config.ollama_api_key = Some(token.to_string());
    }
    if let Some(timeout) = args.llm_timeout {
        config.timeout_secs = timeout;
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let analyzer = LogAnalyzer::new(config);
    let request = AnalysisRequest::new(&args.provider, &args.model, &args.log_file)
        .with_credential(args.api_key.clone())
        .with_context(&args.context);

    info!("Parsing log file: {}", args.log_file.display());
    let document = analyzer
        .load_document(&request)
        .context("Log analysis failed")?;

    let terminal = TerminalReporter::new();
    if args.preview {
        terminal.print_preview(&document.content, PREVIEW_LINES);
    }

    let progress = spinner(format!("Running analysis with {} ({})", args.provider, args.model));
    let analysis = analyzer.analyze_document(&request, &document).await;
    progress.finish_and_clear();
    let raw_response = analysis.context("Log analysis failed")?;
    info!("Log analysis complete!");

    let cleaned_response = clean_response(&raw_response);

    let formatted_response = if args.no_refactor {
        None
    } else {
        let progress = spinner("Formatting the report");
        let refactored = refactor_response(
            &analyzer,
            &args.provider,
            request.credential(),
            &args.model,
            &cleaned_response,
        )
        .await;
        progress.finish_and_clear();

        if refactored.is_none() {
            warn!("Refactoring failed, falling back to the cleaned response");
        }
        refactored
    };

    let report = AnalysisReport {
        source: document.source.clone(),
        format: document.format,
        provider: args.provider.clone(),
        model: args.model.clone(),
        generated_at: chrono::Utc::now(),
        raw_response,
        cleaned_response,
        formatted_response,
    };

    match args.report {
        ReportFormat::Terminal => {
            terminal.report(&report)?;
        }
        ReportFormat::Json => {
            let reporter = JsonReporter::new();
            match &args.output {
                Some(path) => {
                    reporter.save_report(&report, path)?;
                    info!("✅ Report saved to: {}", path.display());
                }
                None => println!("{}", reporter.render(&report)?),
            }
        }
        ReportFormat::Markdown => {
            let output_path = args.output.clone().unwrap_or_else(|| {
                let timestamp = report.generated_at.format("%Y%m%d_%H%M%S");
                PathBuf::from(format!("log_analysis_{}.md", timestamp))
            });

            info!("Generating markdown report: {}", output_path.display());
            MarkdownReporter::new().save_report(&report, &output_path)?;
            info!("✅ Report saved to: {}", output_path.display());
        }
    }

    Ok(())
}
