//! Kubernetes MCP Server
//!
//! Model Context Protocol server exposing Kubernetes cluster operations
//! to LLM agents over stdio or HTTP.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kube_mcp::cli::{Cli, Command};
use kube_mcp::config::ServerConfig;
use kube_mcp::resources::init_toolsets;
use kube_mcp::translations::Translator;
use kube_mcp::{transport, KubeMcpServer};
use kube_mcp_sdk::{connect, KubeClusterClient, SharedCluster};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, skipped_config) = ServerConfig::load(&cli)?;

    init_tracing(config.log_file.as_deref())?;
    if let Some(e) = skipped_config {
        tracing::warn!(error = %e, "Failed to load config file, using defaults");
    }
    config.validate().context("invalid configuration")?;

    tracing::info!(
        read_only = config.read_only,
        namespace = %config.namespace,
        "kube-mcp starting"
    );

    let client = connect(&config.connection_options())
        .await
        .context("failed to create Kubernetes client")?;
    let cluster: SharedCluster = Arc::new(KubeClusterClient::new(client));

    let translator = Translator::from_environment().context("failed to load translations")?;
    let toolsets = init_toolsets(
        config.toolsets.as_slice(),
        config.read_only,
        cluster,
        &translator,
        config.resource_types.as_slice(),
    )
    .context("failed to initialize toolsets")?;

    if config.export_translations {
        let path = translator.dump().context("failed to export translations")?;
        tracing::info!(path = %path.display(), "Exported translations");
    }

    let server = KubeMcpServer::new(&toolsets);
    match cli.command {
        Command::Stdio(_) => transport::run_stdio(server, config.log_commands).await,
        Command::Sse(_) => transport::run_sse(server, config.port).await,
    }
}

/// Logs go to stderr, or as JSON to `log_file`. stdout belongs to the stdio transport.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("kube_mcp=info".parse()?);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
