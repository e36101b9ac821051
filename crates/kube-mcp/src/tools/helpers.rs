//! Shared helper functions for MCP tool implementations.

use std::future::Future;
use std::sync::Arc;

use kube_mcp_sdk::{ClusterError, SharedCluster};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::params::ParamError;
use crate::toolsets::ServerTool;

/// Failure inside a tool handler.
///
/// Everything except `Serialization` is reported to the client as an error tool
/// result so the model can read it and retry.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("{0}")]
    Invalid(String),

    #[error("failed to {action}: {source}")]
    Cluster {
        action: &'static str,
        #[source]
        source: ClusterError,
    },

    #[error("failed to marshal response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// `map_err` adapter: `.map_err(ToolError::cluster("get pod"))`.
    pub fn cluster(action: &'static str) -> impl FnOnce(ClusterError) -> Self {
        move |source| Self::Cluster { action, source }
    }
}

/// Plain text success result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Compact JSON success result.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, ToolError> {
    Ok(text_result(serde_json::to_string(value)?))
}

/// Convert a handler outcome into what the MCP service expects.
pub fn finish(result: Result<CallToolResult, ToolError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(result) => Ok(result),
        Err(ToolError::Serialization(e)) => Err(McpError::internal_error(
            format!("failed to marshal response: {e}"),
            None,
        )),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

/// JSON Schema object for a parameter struct, as advertised in `tools/list`.
pub fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    let mut object = match serde_json::to_value(schema) {
        Ok(Value::Object(object)) => object,
        _ => JsonObject::new(),
    };
    object.remove("$schema");
    object
        .entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    Arc::new(object)
}

/// Build a tool definition whose input schema comes from `P`.
pub fn tool<P: JsonSchema>(name: &'static str, description: String) -> Tool {
    Tool::new(name, description, input_schema::<P>())
}

/// Bind a cluster-backed handler to its tool definition.
pub fn cluster_tool<F, Fut>(tool: Tool, cluster: SharedCluster, run: F) -> ServerTool
where
    F: Fn(SharedCluster, JsonObject) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
{
    ServerTool::new(tool, move |args| {
        let call = run(cluster.clone(), args);
        async move { finish(call.await) }
    })
}
