//! Deployment tools: `get_deployment`, `list_deployments`, `scale_deployment`.

use kube_mcp_sdk::SharedCluster;
use rmcp::model::{CallToolResult, JsonObject};

use super::list_selectors;
use crate::tools::{
    cluster_tool, json_result, required_int, required_param, tool, GetDeploymentParams,
    ListNamespacedParams, ParamError, ScaleDeploymentParams, ToolError,
};
use crate::toolsets::{ResourceHandler, ServerTool, Toolset};
use crate::translations::Translator;

#[derive(Debug, Clone)]
pub struct DeploymentHandler {
    cluster: SharedCluster,
    translator: Translator,
}

impl DeploymentHandler {
    pub fn new(cluster: SharedCluster, translator: Translator) -> Self {
        Self {
            cluster,
            translator,
        }
    }

    pub fn get(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_GET_DEPLOYMENT_DESCRIPTION",
            "Get details of a specific deployment",
        );
        cluster_tool(
            tool::<GetDeploymentParams>("get_deployment", description),
            self.cluster.clone(),
            get_deployment,
        )
    }

    pub fn list(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_LIST_DEPLOYMENTS_DESCRIPTION",
            "List deployments in a namespace",
        );
        cluster_tool(
            tool::<ListNamespacedParams>("list_deployments", description),
            self.cluster.clone(),
            list_deployments,
        )
    }

    pub fn scale(&self) -> ServerTool {
        let description = self.translator.translate(
            "TOOL_SCALE_DEPLOYMENT_DESCRIPTION",
            "Scale a deployment to a specified number of replicas",
        );
        cluster_tool(
            tool::<ScaleDeploymentParams>("scale_deployment", description),
            self.cluster.clone(),
            scale_deployment,
        )
    }
}

impl ResourceHandler for DeploymentHandler {
    fn register_tools(&self, toolset: &mut Toolset) {
        toolset
            .add_read_tool(self.get())
            .add_read_tool(self.list())
            .add_write_tool(self.scale());
    }
}

async fn get_deployment(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;

    let deployment = cluster
        .get_deployment(&namespace, &name)
        .await
        .map_err(ToolError::cluster("get deployment"))?;
    json_result(&deployment)
}

async fn list_deployments(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let selectors = list_selectors(&args)?;

    let deployments = cluster
        .list_deployments(&namespace, &selectors)
        .await
        .map_err(ToolError::cluster("list deployments"))?;
    json_result(&deployments)
}

async fn scale_deployment(
    cluster: SharedCluster,
    args: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let namespace: String = required_param(&args, "namespace")?;
    let name: String = required_param(&args, "name")?;
    // Presence check only: `replicas: 0` must scale to zero, which the generic
    // zero-is-missing rule of `required_param` would reject.
    let replicas = match required_int(&args, "replicas") {
        Ok(replicas) => replicas,
        Err(ParamError::NotInteger(_)) => {
            return Err(ToolError::invalid("replicas must be an integer"))
        }
        Err(e) => return Err(e.into()),
    };
    if replicas < 0 {
        return Err(ToolError::invalid("replicas must be non-negative"));
    }
    let replicas = i32::try_from(replicas)
        .map_err(|_| ToolError::invalid(format!("replicas must be at most {}", i32::MAX)))?;

    let deployment = cluster
        .scale_deployment(&namespace, &name, replicas)
        .await
        .map_err(ToolError::cluster("scale deployment"))?;
    json_result(&deployment)
}
