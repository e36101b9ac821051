//! stdio and HTTP transports for [`KubeMcpServer`].

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::ServiceExt;
use tokio::signal;
use tracing::{info, warn};

use crate::io_logger::{LoggedReader, LoggedWriter};
use crate::server::KubeMcpServer;

/// Base path of the streamable HTTP endpoint.
pub const MCP_PATH: &str = "/mcp";

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Serve MCP over stdin/stdout until the client disconnects or a shutdown signal arrives.
pub async fn run_stdio(server: KubeMcpServer, log_commands: bool) -> anyhow::Result<()> {
    let (stdin, stdout) = rmcp::transport::io::stdio();

    let service = if log_commands {
        server
            .serve((LoggedReader::new(stdin), LoggedWriter::new(stdout)))
            .await
            .context("failed to start stdio server")?
    } else {
        server
            .serve((stdin, stdout))
            .await
            .context("failed to start stdio server")?
    };
    eprintln!("Kubernetes MCP Server running on stdio");

    let cancel = service.cancellation_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        cancel.cancel();
    });

    let reason = service.waiting().await.context("stdio server task failed")?;
    info!(?reason, "stdio server stopped");
    Ok(())
}

/// Serve the streamable HTTP endpoint under [`MCP_PATH`].
pub async fn run_sse(server: KubeMcpServer, port: u16) -> anyhow::Result<()> {
    let router = router(server);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(port, path = MCP_PATH, "SSE server listening");
    eprintln!("Kubernetes MCP Server running on http://{addr}{MCP_PATH}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("SSE server stopped");
    Ok(())
}

/// The axum router hosting the MCP service.
pub fn router(server: KubeMcpServer) -> axum::Router {
    let mut config = StreamableHttpServerConfig::default();
    config.sse_keep_alive = Some(SSE_KEEP_ALIVE);

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        config,
    );
    axum::Router::new().nest_service(MCP_PATH, service)
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
