//! MCP ServerHandler implementation for Kubernetes.
//!
//! Serves the active tools of a [`ToolsetGroup`]:
//!
//! **Read tools**
//! - `get_pod` / `list_pods` / `get_pod_logs`
//! - `get_deployment` / `list_deployments`
//! - `get_service` / `list_services`
//! - `get_configmap` / `list_configmaps`
//! - `get_namespace` / `list_namespaces`
//! - `get_node` / `list_nodes`
//!
//! **Write tools (hidden in read-only mode)**
//! - `delete_pod`: delete a pod, optionally with a grace period
//! - `scale_deployment`: set a deployment's replica count

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use tracing::debug;

use crate::toolsets::{ServerTool, ToolsetGroup};

/// Name reported in the MCP `initialize` handshake.
pub const SERVER_NAME: &str = "k8s-mcp-server";

/// Kubernetes MCP server handler.
#[derive(Debug, Clone)]
pub struct KubeMcpServer {
    tools: Arc<Vec<Tool>>,
    handlers: Arc<HashMap<String, ServerTool>>,
    read_only: bool,
}

impl KubeMcpServer {
    /// Snapshot the group's active tools. Later changes to the group are not seen.
    pub fn new(toolsets: &ToolsetGroup) -> Self {
        let active = toolsets.active_tools();
        let tools = active.iter().map(|t| t.tool.clone()).collect();
        let handlers = active
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self {
            tools: Arc::new(tools),
            handlers: Arc::new(handlers),
            read_only: toolsets.is_read_only(),
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn instructions(&self) -> String {
        let names: Vec<&str> = self.tools.iter().map(|t| t.name.as_ref()).collect();
        let mode = if self.read_only {
            "Running in READ-ONLY mode: delete_pod and scale_deployment are unavailable."
        } else {
            "Write tools are enabled: delete_pod and scale_deployment change cluster state. \
             Confirm with the user before calling them."
        };
        format!(
            "Kubernetes MCP server. Inspect workloads and cluster objects through the tools below.\n\
             Every namespaced tool requires a 'namespace' argument; list tools accept optional \
             'fieldSelector' and 'labelSelector' arguments using Kubernetes selector syntax.\n\
             {mode}\n\
             Available tools: {}",
            names.join(", ")
        )
    }
}

impl ServerHandler for KubeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Kubernetes MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing Kubernetes pods, deployments, services, configmaps, \
                     namespaces and nodes"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(self.instructions()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools.as_ref().clone()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name: &str = &request.name;
        let Some(tool) = self.handlers.get(name) else {
            debug!(tool = %name, "Unknown tool requested");
            return Err(McpError::invalid_params(
                format!("tool {name} not found"),
                None,
            ));
        };

        debug!(tool = %name, "Calling tool");
        let result = tool.call(request.arguments.unwrap_or_default()).await;
        if let Ok(ref result) = result {
            debug!(tool = %name, is_error = ?result.is_error, "Tool call finished");
        }
        result
    }
}
