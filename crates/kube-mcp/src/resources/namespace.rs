//! Namespace tools: `get_namespace`, `list_namespaces`.

use kube_mcp_sdk::SharedCluster;
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, required_param, tool, GetNamespaceParams, ListClusterParams,
    ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct NamespaceHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl NamespaceHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_GET_NAMESPACE_DESCRIPTION",
            "Get details of a specific namespace",
        );
        cluster_tool(
            tool::<GetNamespaceParams>("get_namespace", description),
            self.cluster.clone(),
            get_namespace,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_LIST_NAMESPACES_DESCRIPTION", "List namespaces");
        cluster_tool(
            tool::<ListClusterParams>("list_namespaces", description),
            self.cluster.clone(),
            list_namespaces,
        )
    }
}

impl ResourceHandler for NamespaceHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset.add_read_tool(self.get()).add_read_tool(self.list());
    }
}

async fn get_namespace(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let name: String = required_param(&args, "name")?;

    let namespace = cluster
        .get_namespace(&name)
        .await
        .map_err(ToolError::cluster("get namespace"))?;
    json_result(&namespace)
}

async fn list_namespaces(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let selectors = list_selectors(&args)?;

    let namespaces = cluster
        .list_namespaces(&selectors)
        .await
        .map_err(ToolError::cluster("list namespaces"))?;
    json_result(&namespaces)
}
