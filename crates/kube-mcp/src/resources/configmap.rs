//! ConfigMap tools: `get_configmap`, `list_configmaps`.

use kube_mcp_sdk::SharedCluster;
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, required_param, tool, GetConfigMapParams, ListNamespacedParams,
    ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct ConfigMapHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl ConfigMapHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_GET_CONFIGMAP_DESCRIPTION",
            "Get details of a specific configmap",
        );
        cluster_tool(
            tool::<GetConfigMapParams>("get_configmap", description),
            self.cluster.clone(),
            get_configmap,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_LIST_CONFIGMAPS_DESCRIPTION",
            "List configmaps in a namespace",
        );
        cluster_tool(
            tool::<ListNamespacedParams>("list_configmaps", description),
            self.cluster.clone(),
            list_configmaps,
        )
    }
}

impl ResourceHandler for ConfigMapHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset.add_read_tool(self.get()).add_read_tool(self.list());
    }
}

async fn get_configmap(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;

    let config_map = cluster
        .get_config_map(&namespace, &name)
        .await
        .map_err(ToolError::cluster("get configmap"))?;
    json_result(&config_map)
}

async fn list_configmaps(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let selectors = list_selectors(&args)?;

    let config_maps = cluster
        .list_config_maps(&namespace, &selectors)
        .await
        .map_err(ToolError::cluster("list configmaps"))?;
    json_result(&config_maps)
}
