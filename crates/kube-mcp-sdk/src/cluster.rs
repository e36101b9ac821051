//! The cluster access seam.
//!
//! [`ClusterClient`] has one method per Kubernetes API call the MCP tools make.
//! Tools hold a [`SharedCluster`] and never see `kube::Api` directly, which keeps
//! the tool layer testable against [`InMemoryCluster`](crate::testing::InMemoryCluster).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Service};
use k8s_openapi::List;

use crate::error::ClusterResult;

/// Shared handle to a cluster client, cloned into every tool handler.
pub type SharedCluster = Arc<dyn ClusterClient>;

/// Field and label selectors for list calls.
///
/// Empty strings are normalized to `None` so callers can pass optional tool
/// parameters straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    field: Option<String>,
    label: Option<String>,
}

impl Selectors {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: non_empty(field.into()),
            label: non_empty(label.into()),
        }
    }

    /// Selectors matching everything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Options for reading pod logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Container to read from; `None` means the pod's only container.
    pub container: Option<String>,
    /// Number of lines from the end of the log.
    pub tail_lines: Option<i64>,
    /// Read the previous terminated container's logs.
    pub previous: bool,
}

/// Kubernetes operations exposed as MCP tools.
#[async_trait]
pub trait ClusterClient: Send + Sync + fmt::Debug {
    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod>;

    async fn list_pods(&self, namespace: &str, selectors: &Selectors) -> ClusterResult<List<Pod>>;

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        options: &LogOptions,
    ) -> ClusterResult<String>;

    /// Delete a pod. `grace_period_seconds` overrides the pod's termination grace period.
    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: Option<u32>,
    ) -> ClusterResult<()>;

    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment>;

    async fn list_deployments(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Deployment>>;

    /// Set `spec.replicas` on a deployment and return the updated object.
    async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> ClusterResult<Deployment>;

    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service>;

    async fn list_services(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Service>>;

    async fn get_config_map(&self, namespace: &str, name: &str) -> ClusterResult<ConfigMap>;

    async fn list_config_maps(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<ConfigMap>>;

    async fn get_namespace(&self, name: &str) -> ClusterResult<Namespace>;

    async fn list_namespaces(&self, selectors: &Selectors) -> ClusterResult<List<Namespace>>;

    async fn get_node(&self, name: &str) -> ClusterResult<Node>;

    async fn list_nodes(&self, selectors: &Selectors) -> ClusterResult<List<Node>>;
}
