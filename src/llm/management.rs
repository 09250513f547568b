//! Local model service housekeeping: installed models, pulls, and starting
//! `ollama serve` in the background.

use crate::llm::config::ProviderConfig;
use crate::llm::ollama::OllamaProvider;
use crate::llm::provider::{LlmError, LlmProvider};
use std::net::SocketAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{error, info};

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// How long a fresh `ollama serve` gets to fail fast (e.g. bind errors)
const STARTUP_GRACE: Duration = Duration::from_millis(300);

/// Address `ollama serve` binds to, read by the service from OLLAMA_HOST
fn bind_address(port: u16) -> String {
    format!("127.0.0.1:{}", port)
}

fn serve_command(program: &str, port: u16) -> Command {
    let mut command = Command::new(program);
    command
        .arg("serve")
        .env("OLLAMA_HOST", bind_address(port))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// List models installed in the local service
pub async fn list_local_models(config: ProviderConfig) -> Result<Vec<String>, LlmError> {
    OllamaProvider::new(config)?.list_models().await
}

/// Pull a model into the local service
pub async fn pull_model(config: ProviderConfig, model: &str) -> Result<String, LlmError> {
    OllamaProvider::new(config)?.pull_model(model).await
}

/// Connect-and-close check. Best effort, not a lock.
pub async fn is_port_in_use(host: &str, port: u16) -> bool {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(addr) => addr,
        Err(_) => return false,
    };

    matches!(
        tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Start `ollama serve` on `port` detached, unless something already listens
/// there. Only an immediate exit is reported; readiness is not awaited.
pub async fn start_service(port: u16) -> String {
    start_service_with(port, "ollama").await
}

async fn start_service_with(port: u16, program: &str) -> String {
    if is_port_in_use("127.0.0.1", port).await {
        return "Ollama service is already running.".to_string();
    }

    let mut child = match serve_command(program, port).spawn() {
        Ok(child) => child,
        Err(e) => {
            error!("Error starting Ollama service: {}", e);
            return format!("Error starting Ollama service: {}", e);
        }
    };
    info!(
        "Spawned {} serve on {} (pid {:?})",
        program,
        bind_address(port),
        child.id()
    );

    match tokio::time::timeout(STARTUP_GRACE, child.wait()).await {
        Ok(Ok(status)) if !status.success() => {
            error!("Ollama service exited with {}", status);
            format!("Error starting Ollama service: exited with {}", status)
        }
        Ok(Err(e)) => {
            error!("Error waiting on Ollama service: {}", e);
            format!("Error starting Ollama service: {}", e)
        }
        Ok(Ok(_)) => "Ollama service is starting...".to_string(),
        Err(_) => {
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) if !status.success() => {
                        error!("Ollama service exited with {}", status);
                    }
                    Err(e) => error!("Error waiting on Ollama service: {}", e),
                    _ => {}
                }
            });
            "Ollama service is starting...".to_string()
        }
    }
}
