use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logbuddy",
    about = "AI-assisted security triage for log files",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a security analysis of a log file
    Analyze(AnalyzeArgs),

    /// Manage models of the local Ollama service
    Models {
        #[command(subcommand)]
        action: ModelsCommand,
    },

    /// Start the local Ollama service in the background
    Serve {
        /// Port the local service listens on
        #[arg(long, default_value = "11434")]
        port: u16,
    },

    /// Display current configuration
    Config,

    /// Show information about logbuddy
    Info,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Log file to analyze (.csv, .json, anything else is read as text)
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,

    /// LLM provider: ollama or openai
    #[arg(short, long, default_value = "ollama")]
    pub provider: String,

    /// Model identifier
    #[arg(short, long, default_value = "llama3.2")]
    pub model: String,

    /// Additional context for the analysis
    #[arg(short, long, default_value = "")]
    pub context: String,

    /// API key for the hosted provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Bearer token for the local Ollama service
    #[arg(long, env = "OLLAMA_API_KEY", hide_env_values = true)]
    pub ollama_token: Option<String>,

    /// Ollama API URL
    #[arg(long, env = "OLLAMA_API_URL")]
    pub api_url: Option<String>,

    /// Skip the second reformatting pass
    #[arg(long)]
    pub no_refactor: bool,

    /// Print the parsed log text before analysis
    #[arg(long)]
    pub preview: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub report: ReportFormat,

    /// Output file path (required for markdown format, ignored for terminal)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// LLM request timeout in seconds
    #[arg(long)]
    pub llm_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List available models
    List {
        /// Provider to query
        #[arg(short, long, default_value = "ollama")]
        provider: String,

        /// API key for the hosted provider
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Bearer token for the local Ollama service
        #[arg(long, env = "OLLAMA_API_KEY", hide_env_values = true)]
        ollama_token: Option<String>,
    },

    /// Pull a model into the local Ollama service
    Pull {
        /// Model name, e.g. gemma2:2b or llama3.2
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["logbuddy", "analyze", "auth.csv"]).unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.log_file, PathBuf::from("auth.csv"));
                assert_eq!(args.provider, "ollama");
                assert_eq!(args.report, ReportFormat::Terminal);
                assert!(!args.no_refactor);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn test_parse_analyze_with_options() {
        let cli = Cli::try_parse_from([
            "logbuddy",
            "--verbose",
            "analyze",
            "events.json",
            "--provider",
            "OpenAI",
            "--model",
            "gpt-4",
            "--context",
            "payment service",
            "--api-key",
            "sk-test",
            "--report",
            "markdown",
            "--output",
            "report.html",
            "--no-refactor",
            "--ollama-token",
            "local-token",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.provider, "OpenAI");
                assert_eq!(args.model, "gpt-4");
                assert_eq!(args.context, "payment service");
                assert_eq!(args.api_key.as_deref(), Some("sk-test"));
                assert_eq!(args.report, ReportFormat::Markdown);
                assert_eq!(args.output, Some(PathBuf::from("report.html")));
                assert!(args.no_refactor);
                assert_eq!(args.ollama_token.as_deref(), Some("local-token"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_models_pull() {
        let cli = Cli::try_parse_from(["logbuddy", "models", "pull", "gemma2:2b"]).unwrap();
        match cli.command {
            Commands::Models {
                action: ModelsCommand::Pull { name },
            } => assert_eq!(name, "gemma2:2b"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
