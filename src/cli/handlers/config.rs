use crate::cli::utils::mask_secret;
use crate::llm::LlmConfig;
use anyhow::Result;
use std::env;

pub fn handle_config_command() -> Result<()> {
    // Load .env file if it exists
    let env_file_loaded = dotenv::dotenv().is_ok();
    let config = LlmConfig::from_env();

    println!("🔧 logbuddy Configuration");
    println!("═══════════════════════════════════════");
    println!();

    println!("📦 Version Information:");
    println!("  • logbuddy: v{}", env!("CARGO_PKG_VERSION"));
    println!("  • License: {}", env!("CARGO_PKG_LICENSE"));
    println!();

    println!("🌍 Environment Configuration:");
    if env_file_loaded {
        println!("  • .env file: ✅ Loaded");
    } else {
        println!("  • .env file: ⚠️  Not found (using system environment)");
    }

    match &config.openai_api_key {
        Some(key) => println!("  • OPENAI_API_KEY: ✅ Set ({})", mask_secret(key)),
        None => println!("  • OPENAI_API_KEY: ❌ Not set"),
    }
    match &config.ollama_api_key {
        Some(_) => println!("  • OLLAMA_API_KEY: ✅ Set (hidden)"),
        None => println!("  • OLLAMA_API_KEY: not set (local service without auth)"),
    }
    match env::var("RUST_LOG") {
        Ok(val) => println!("  • RUST_LOG: {}", val),
        Err(_) => println!("  • RUST_LOG: info (default)"),
    }
    println!();

    println!("🤖 Provider Configuration:");
    println!("  • Ollama API URL: {}", config.ollama_api_url);
    match &config.openai_api_base {
        Some(base) => println!("  • OpenAI API base: {}", base),
        None => println!("  • OpenAI API base: default"),
    }
    println!("  • Request timeout: {} seconds", config.timeout_secs);
    println!("  • Temperature: {}", config.params.temperature);
    println!("  • Max tokens: {}", config.params.max_tokens);
    if let Some(penalty) = config.params.frequency_penalty {
        println!("  • Frequency penalty: {}", penalty);
    }
    if let Some(penalty) = config.params.presence_penalty {
        println!("  • Presence penalty: {}", penalty);
    }
    println!("  • Debug: {}", config.debug);

    if let Err(e) = config.validate() {
        println!();
        println!("⚠️  Configuration problem: {}", e);
    }

    println!();
    println!("💡 Tips:");
    if config.openai_api_key.is_none() {
        println!("  • Set OPENAI_API_KEY to analyze with the hosted provider");
    }
    println!("  • Run `logbuddy serve` to start a local Ollama service");
    println!("  • Use RUST_LOG=debug for detailed logging");

    Ok(())
}
