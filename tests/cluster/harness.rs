//! Test harness for live-cluster MCP tests.
//!
//! Connects to the cluster the same way the binary does and serves the
//! resulting toolsets to an MCP client over a duplex transport.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo};
use rmcp::service::{RoleClient, RunningService};
use rmcp::{ClientHandler, ServiceExt};
use serde_json::Value;
use tokio::task::JoinHandle;

use kube_mcp::config::ServerConfig;
use kube_mcp::resources::init_toolsets;
use kube_mcp::translations::Translator;
use kube_mcp::KubeMcpServer;
use kube_mcp_sdk::{connect, KubeClusterClient, SharedCluster};

#[derive(Debug, Clone, Default)]
pub(super) struct TestClient;

impl ClientHandler for TestClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

/// MCP server/client pair backed by a live cluster. Always read-only.
pub struct ClusterTestHarness {
    pub mcp_client: RunningService<RoleClient, TestClient>,
    server_handle: JoinHandle<Result<()>>,
}

impl ClusterTestHarness {
    pub async fn setup() -> Result<Self> {
        let config = ServerConfig::default();
        let client = connect(&config.connection_options()).await?;
        let cluster: SharedCluster = Arc::new(KubeClusterClient::new(client));

        let group = init_toolsets(&["all"], true, cluster, &Translator::null(), &["all"])?;
        let server = KubeMcpServer::new(&group);
        let (server_transport, client_transport) = tokio::io::duplex(65536);

        let server_handle = tokio::spawn(async move {
            let service = server.serve(server_transport).await?;
            service.waiting().await?;
            anyhow::Ok(())
        });

        let mcp_client = TestClient.serve(client_transport).await?;

        Ok(Self {
            mcp_client,
            server_handle,
        })
    }

    pub async fn call_tool_raw(&self, name: &str, args: Value) -> Result<CallToolResult> {
        let result = self
            .mcp_client
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_string().into(),
                arguments: args.as_object().cloned(),
                task: None,
            })
            .await?;
        Ok(result)
    }

    /// Call a tool and parse the text response as JSON. Tool errors become `Err`.
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<Value> {
        let result = self.call_tool_raw(name, args).await?;
        let text = result
            .content
            .first()
            .and_then(|c| c.raw.as_text())
            .map(|t| t.text.clone())
            .ok_or_else(|| anyhow::anyhow!("No text content in tool response"))?;

        if result.is_error == Some(true) {
            anyhow::bail!("{name} failed: {text}");
        }
        let parsed: Value = serde_json::from_str(&text)?;
        Ok(parsed)
    }

    pub async fn teardown(self) -> Result<()> {
        self.mcp_client.cancel().await?;
        self.server_handle.await??;
        Ok(())
    }
}
