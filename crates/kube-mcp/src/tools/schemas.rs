//! Parameter structs for all MCP tools.
//!
//! These only describe the input schema advertised in `tools/list`. Handlers read
//! arguments with the helpers in [`params`](super::params) so type errors come
//! back as tool results rather than protocol errors.

use schemars::JsonSchema;
use serde::Deserialize;

// ── pods ──

/// Parameters for the `get_pod` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPodParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Pod name")]
    pub name: String,
}

/// Parameters for the `get_pod_logs` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodLogsParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Pod name")]
    pub name: String,
    #[schemars(description = "Container name (optional if pod has only one container)")]
    pub container: Option<String>,
    #[schemars(description = "Number of lines from the end of the logs to show")]
    pub tail_lines: Option<f64>,
    #[schemars(description = "Return previous terminated container logs")]
    pub previous: Option<bool>,
}

/// Parameters for the `delete_pod` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePodParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Pod name")]
    pub name: String,
    #[schemars(description = "The duration in seconds before the pod should be deleted")]
    pub grace_period_seconds: Option<f64>,
}

// ── deployments ──

/// Parameters for the `get_deployment` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetDeploymentParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Deployment name")]
    pub name: String,
}

/// Parameters for the `scale_deployment` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScaleDeploymentParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Deployment name")]
    pub name: String,
    #[schemars(description = "Number of replicas")]
    pub replicas: f64,
}

// ── services / configmaps ──

/// Parameters for the `get_service` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetServiceParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Service name")]
    pub name: String,
}

/// Parameters for the `get_configmap` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetConfigMapParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "ConfigMap name")]
    pub name: String,
}

// ── cluster-scoped ──

/// Parameters for the `get_namespace` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetNamespaceParams {
    #[schemars(description = "Namespace name")]
    pub name: String,
}

/// Parameters for the `get_node` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetNodeParams {
    #[schemars(description = "Node name")]
    pub name: String,
}

// ── list ──

/// Parameters shared by the namespaced `list_*` tools.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListNamespacedParams {
    #[schemars(description = "Kubernetes namespace")]
    pub namespace: String,
    #[schemars(description = "Selector to restrict the list of returned objects by their fields")]
    pub field_selector: Option<String>,
    #[schemars(description = "Selector to restrict the list of returned objects by their labels")]
    pub label_selector: Option<String>,
}

/// Parameters shared by the cluster-scoped `list_*` tools.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListClusterParams {
    #[schemars(description = "Selector to restrict the list of returned objects by their fields")]
    pub field_selector: Option<String>,
    #[schemars(description = "Selector to restrict the list of returned objects by their labels")]
    pub label_selector: Option<String>,
}
