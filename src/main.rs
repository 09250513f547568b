use anyhow::Result;
use clap::Parser;
use logbuddy::cli::commands::{Cli, Commands};
use logbuddy::cli::handlers::{
    handle_analyze_command, handle_config_command, handle_models_command, handle_serve_command,
};
use logbuddy::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed arguments
    let _ = dotenv::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format)?;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => handle_analyze_command(args).await,

        Commands::Models { action } => handle_models_command(action).await,

        Commands::Serve { port } => handle_serve_command(port).await,

        Commands::Config => handle_config_command(),

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
