//! Kubernetes resource tool handlers and toolset assembly.
//!
//! Each submodule provides a [`ResourceHandler`] for one resource kind.
//! [`init_toolsets`] wires the enabled kinds into the single `k8s_resources`
//! toolset and applies the enable list and read-only flag.

pub mod configmap;
pub mod deployment;
pub mod namespace;
pub mod node;
pub mod pod;
pub mod service;

use std::collections::BTreeSet;

use kube_mcp_sdk::{Selectors, SharedCluster};
use rmcp::model::JsonObject;
use tracing::debug;

pub use configmap::ConfigMapHandler;
pub use deployment::DeploymentHandler;
pub use namespace::NamespaceHandler;
pub use node::NodeHandler;
pub use pod::PodHandler;
pub use service::ServiceHandler;

use crate::tools::{optional_param, ParamError};
use crate::toolsets::{
    ResourceHandler, ResourceRegistry, ResourceType, Toolset, ToolsetError, ToolsetGroup, ALL,
};
use crate::translations::Translator;

/// Name of the toolset holding every resource tool.
pub const K8S_RESOURCES_TOOLSET: &str = "k8s_resources";

/// Toolsets enabled when none are configured.
pub const DEFAULT_TOOLSETS: &[&str] = &[ALL];

/// Optional `fieldSelector` / `labelSelector` arguments of the list tools.
pub(crate) fn list_selectors(args: &JsonObject) -> Result<Selectors, ParamError> {
    let field: String = optional_param(args, "fieldSelector")?;
    let label: String = optional_param(args, "labelSelector")?;
    Ok(Selectors::new(field, label))
}

fn handler_for(
    kind: ResourceType,
    cluster: SharedCluster,
    translator: Translator,
) -> Box<dyn ResourceHandler> {
    match kind {
        ResourceType::Pod => Box::new(PodHandler::new(cluster, translator)),
        ResourceType::Deployment => Box::new(DeploymentHandler::new(cluster, translator)),
        ResourceType::Service => Box::new(ServiceHandler::new(cluster, translator)),
        ResourceType::ConfigMap => Box::new(ConfigMapHandler::new(cluster, translator)),
        ResourceType::Namespace => Box::new(NamespaceHandler::new(cluster, translator)),
        ResourceType::Node => Box::new(NodeHandler::new(cluster, translator)),
    }
}

/// Register a handler for each enabled resource type.
pub fn register_all_resources(
    registry: &mut ResourceRegistry,
    cluster: &SharedCluster,
    translator: &Translator,
    resource_types: &BTreeSet<ResourceType>,
) {
    for kind in resource_types {
        registry.register_boxed(*kind, handler_for(*kind, cluster.clone(), translator.clone()));
    }
}

/// A toolset holding the tools of every registered handler.
pub fn create_toolset(registry: &ResourceRegistry, name: &str) -> Toolset {
    let mut toolset = Toolset::new(name, "K8s resources related tools");
    for (kind, handler) in registry.handlers() {
        debug!(resource = %kind, toolset = name, "Registering resource tools");
        handler.register_tools(&mut toolset);
    }
    toolset
}

/// Build the toolset group served by the MCP server.
pub fn init_toolsets<S: AsRef<str>, R: AsRef<str>>(
    enabled_toolsets: &[S],
    read_only: bool,
    cluster: SharedCluster,
    translator: &Translator,
    resource_types: &[R],
) -> Result<ToolsetGroup, ToolsetError> {
    let resource_types = ResourceType::resolve(resource_types)?;

    let mut registry = ResourceRegistry::new();
    register_all_resources(&mut registry, &cluster, translator, &resource_types);

    let mut group = ToolsetGroup::new(read_only);
    group.add_toolset(create_toolset(&registry, K8S_RESOURCES_TOOLSET));
    group.enable_toolsets(enabled_toolsets)?;
    Ok(group)
}
