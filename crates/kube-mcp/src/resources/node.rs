//! Node tools: `get_node`, `list_nodes`.

use kube_mcp_sdk::SharedCluster;
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, required_param, tool, GetNodeParams, ListClusterParams, ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct NodeHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl NodeHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_GET_NODE_DESCRIPTION", "Get details of a specific node");
        cluster_tool(
            tool::<GetNodeParams>("get_node", description),
            self.cluster.clone(),
            get_node,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_LIST_NODES_DESCRIPTION", "List all nodes in the cluster");
        cluster_tool(
            tool::<ListClusterParams>("list_nodes", description),
            self.cluster.clone(),
            list_nodes,
        )
    }
}

impl ResourceHandler for NodeHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset.add_read_tool(self.get()).add_read_tool(self.list());
    }
}

async fn get_node(cluster: SharedCluster, args: JsonObject) -> Result<CallToolResult, ToolError> {
    let name: String = required_param(&args, "name")?;

    let node = cluster
        .get_node(&name)
        .await
        .map_err(ToolError::cluster("get node"))?;
    json_result(&node)
}

async fn list_nodes(cluster: SharedCluster, args: JsonObject) -> Result<CallToolResult, ToolError> {
    let selectors = list_selectors(&args)?;

    let nodes = cluster
        .list_nodes(&selectors)
        .await
        .map_err(ToolError::cluster("list nodes"))?;
    json_result(&nodes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kube_mcp_sdk::testing::{labeled, node, InMemoryCluster};
    use serde_json::{json, Value};

    use super::*;

    #[tokio::test]
    async fn test_node_tools() {
        let cluster = InMemoryCluster::new()
            .with_node(labeled(node("cp-1"), &[("node-role.kubernetes.io/control-plane", "")]))
            .with_node(node("worker-1"));
        let handler = NodeHandler::new(Arc::new(cluster), Translator::null());

        let list = handler
            .list()
            .call(
                json!({"labelSelector": "!node-role.kubernetes.io/control-plane"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
        let text = &list.content[0].raw.as_text().unwrap().text;
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(value["kind"], "NodeList");
        assert_eq!(value["items"][0]["metadata"]["name"], "worker-1");
        assert_eq!(value["items"].as_array().unwrap().len(), 1);

        let missing = handler
            .get()
            .call(json!({"name": ""}).as_object().cloned().unwrap())
            .await
            .unwrap();
        assert_eq!(missing.is_error, Some(true));
        assert_eq!(
            missing.content[0].raw.as_text().unwrap().text,
            "missing required parameter: name"
        );
    }
}
