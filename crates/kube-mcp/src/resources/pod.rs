//! Pod tools: `get_pod`, `list_pods`, `get_pod_logs`, `delete_pod`.

use kube_mcp_sdk::{LogOptions, SharedCluster};
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, optional_int_param, optional_param, required_param, text_result,
    tool, DeletePodParams, GetPodParams, ListNamespacedParams, PodLogsParams, ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct PodHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl PodHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_GET_POD_DESCRIPTION", "Get details of a specific pod");
        cluster_tool(
            tool::<GetPodParams>("get_pod", description),
            self.cluster.clone(),
            get_pod,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_LIST_PODS_DESCRIPTION", "List pods in a namespace");
        cluster_tool(
            tool::<ListNamespacedParams>("list_pods", description),
            self.cluster.clone(),
            list_pods,
        )
    }

    pub fn logs(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_GET_POD_LOGS_DESCRIPTION", "Get logs from a pod");
        cluster_tool(
            tool::<PodLogsParams>("get_pod_logs", description),
            self.cluster.clone(),
            get_pod_logs,
        )
    }

    pub fn delete(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_DELETE_POD_DESCRIPTION", "Delete a pod");
        cluster_tool(
            tool::<DeletePodParams>("delete_pod", description),
            self.cluster.clone(),
            delete_pod,
        )
    }
}

impl ResourceHandler for PodHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset
            .add_read_tool(self.get())
            .add_read_tool(self.list())
            .add_read_tool(self.logs())
            .add_write_tool(self.delete());
    }
}

async fn get_pod(cluster: SharedCluster, args: JsonObject) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;

    let pod = cluster
        .get_pod(&namespace, &name)
        .await
        .map_err(ToolError::cluster("get pod"))?;
    json_result(&pod)
}

async fn list_pods(cluster: SharedCluster, args: JsonObject) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let selectors = list_selectors(&args)?;

    let pods = cluster
        .list_pods(&namespace, &selectors)
        .await
        .map_err(ToolError::cluster("list pods"))?;
    json_result(&pods)
}

async fn get_pod_logs(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;
    let container: String = optional_param(&args, "container")?;
    let tail_lines: f64 = optional_param(&args, "tailLines")?;
    let previous: bool = optional_param(&args, "previous")?;

    let options = LogOptions {
        container: Some(container).filter(|c| !c.is_empty()),
        // Fractional values are truncated.
        tail_lines: (tail_lines > 0.0).then_some(tail_lines as i64),
        previous,
    };

    let logs = cluster
        .pod_logs(&namespace, &name, &options)
        .await
        .map_err(ToolError::cluster("get pod logs"))?;
    Ok(text_result(logs))
}

async fn delete_pod(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;
    let grace_period = optional_int_param(&args, "gracePeriodSeconds")?;

    let grace_period_seconds =
        (grace_period > 0).then(|| u32::try_from(grace_period).unwrap_or(u32::MAX));

    cluster
        .delete_pod(&namespace, &name, grace_period_seconds)
        .await
        .map_err(ToolError::cluster("delete pod"))?;
    Ok(text_result(format!(
        "Pod {name} in namespace {namespace} deleted successfully"
    )))
}
