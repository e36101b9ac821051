//! Service tools: `get_service`, `list_services`.

use kube_mcp_sdk::SharedCluster;
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, required_param, tool, GetServiceParams, ListNamespacedParams,
    ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct ServiceHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl ServiceHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_GET_SERVICE_DESCRIPTION",
            "Get details of a specific service",
        );
        cluster_tool(
            tool::<GetServiceParams>("get_service", description),
            self.cluster.clone(),
            get_service,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self
            .translator
            .translate("TOOL_LIST_SERVICES_DESCRIPTION", "List services in a namespace");
        cluster_tool(
            tool::<ListNamespacedParams>("list_services", description),
            self.cluster.clone(),
            list_services,
        )
    }
}

impl ResourceHandler for ServiceHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset.add_read_tool(self.get()).add_read_tool(self.list());
    }
}

async fn get_service(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;

    let service = cluster
        .get_service(&namespace, &name)
        .await
        .map_err(ToolError::cluster("get service"))?;
    json_result(&service)
}

async fn list_services(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let selectors = list_selectors(&args)?;

    let services = cluster
        .list_services(&namespace, &selectors)
        .await
        .map_err(ToolError::cluster("list services"))?;
    json_result(&services)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kube_mcp_sdk::testing::{labeled, service, InMemoryCluster};
    use serde_json::{json, Value};

    use super::*;

    fn handler() -> ServiceHandler {
        let cluster = InMemoryCluster::new()
            .with_service(labeled(service("shop", "frontend"), &[("tier", "web")]))
            .with_service(service("shop", "payments"));
        ServiceHandler::new(Arc::new(cluster), Translator::null())
    }

    async fn call(tool: ServerTool, args: Value) -> (bool, String) {
        let result = tool
            .call(args.as_object().cloned().unwrap_or_default())
            .await
            .unwrap();
        let text = result
            .content
            .first()
            .and_then(|c| c.raw.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default();
        (result.is_error == Some(true), text)
    }

    #[tokio::test]
    async fn test_get_service() {
        let (is_error, text) = call(
            handler().get(),
            json!({"namespace": "shop", "name": "frontend"}),
        )
        .await;
        assert!(!is_error);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["spec"]["type"], "ClusterIP");
    }

    #[tokio::test]
    async fn test_get_service_wrong_namespace() {
        let (is_error, text) = call(
            handler().get(),
            json!({"namespace": "default", "name": "frontend"}),
        )
        .await;
        assert!(is_error);
        assert_eq!(text, "failed to get service: services \"frontend\" not found");
    }

    #[tokio::test]
    async fn test_list_services() {
        let (_, text) = call(
            handler().list(),
            json!({"namespace": "shop", "labelSelector": "tier=web"}),
        )
        .await;
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["kind"], "ServiceList");
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_services_requires_namespace() {
        let (is_error, text) = call(handler().list(), json!({})).await;
        assert!(is_error);
        assert_eq!(text, "missing required parameter: namespace");
    }
}
