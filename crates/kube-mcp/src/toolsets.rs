//! Toolsets: named groups of tools that are enabled together.
//!
//! A [`Toolset`] keeps its read tools and write tools apart so read-only mode
//! can drop every mutating tool in one place. A [`ToolsetGroup`] owns all
//! toolsets, applies the global read-only flag, and resolves which tools are
//! active from the names the operator enabled.
//!
//! Resource handlers plug into a toolset through [`ResourceHandler`]; the
//! [`ResourceRegistry`] maps each [`ResourceType`] to its handler.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Name that enables every toolset or every resource type.
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolsetError {
    #[error("toolset {0} does not exist")]
    UnknownToolset(String),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
}

type ToolHandler =
    Arc<dyn Fn(JsonObject) -> BoxFuture<'static, Result<CallToolResult, McpError>> + Send + Sync>;

/// A tool definition paired with the async function that serves it.
#[derive(Clone)]
pub struct ServerTool {
    pub tool: Tool,
    handler: ToolHandler,
}

impl fmt::Debug for ServerTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerTool")
            .field("name", &self.tool.name)
            .finish_non_exhaustive()
    }
}

impl ServerTool {
    pub fn new<F, Fut>(tool: Tool, handler: F) -> Self
    where
        F: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, McpError>> + Send + 'static,
    {
        Self {
            tool,
            handler: Arc::new(move |args| handler(args).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn call(&self, args: JsonObject) -> BoxFuture<'static, Result<CallToolResult, McpError>> {
        (self.handler)(args)
    }
}

/// A named group of related tools.
#[derive(Debug, Clone)]
pub struct Toolset {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    read_only: bool,
    read_tools: Vec<ServerTool>,
    write_tools: Vec<ServerTool>,
}

impl Toolset {
    /// A new toolset, disabled and writable.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: false,
            read_only: false,
            read_tools: Vec::new(),
            write_tools: Vec::new(),
        }
    }

    pub fn add_read_tool(&mut self, tool: ServerTool) -> &mut Self {
        self.read_tools.push(tool);
        self
    }

    pub fn add_read_tools(&mut self, tools: impl IntoIterator<Item = ServerTool>) -> &mut Self {
        self.read_tools.extend(tools);
        self
    }

    /// Ignored once the toolset is read-only.
    pub fn add_write_tool(&mut self, tool: ServerTool) -> &mut Self {
        if !self.read_only {
            self.write_tools.push(tool);
        }
        self
    }

    pub fn add_write_tools(&mut self, tools: impl IntoIterator<Item = ServerTool>) -> &mut Self {
        if !self.read_only {
            self.write_tools.extend(tools);
        }
        self
    }

    pub fn set_read_only(&mut self) {
        self.read_only = true;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Tools served right now: nothing when disabled.
    pub fn active_tools(&self) -> Vec<ServerTool> {
        if self.enabled {
            self.available_tools()
        } else {
            Vec::new()
        }
    }

    /// Tools this toolset would serve if enabled.
    pub fn available_tools(&self) -> Vec<ServerTool> {
        let mut tools = self.read_tools.clone();
        if !self.read_only {
            tools.extend(self.write_tools.iter().cloned());
        }
        tools
    }
}

/// All toolsets known to the server.
#[derive(Debug, Clone, Default)]
pub struct ToolsetGroup {
    toolsets: BTreeMap<String, Toolset>,
    everything_on: bool,
    read_only: bool,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Self::default()
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn add_toolset(&mut self, mut toolset: Toolset) {
        if self.read_only {
            toolset.set_read_only();
        }
        self.toolsets.insert(toolset.name.clone(), toolset);
    }

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.get(name)
    }

    pub fn toolsets(&self) -> impl Iterator<Item = &Toolset> {
        self.toolsets.values()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        if self.everything_on {
            return true;
        }
        self.toolsets.get(name).is_some_and(|t| t.enabled)
    }

    /// Enable toolsets by name. `"all"` anywhere in the list enables every toolset
    /// and short-circuits name validation.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolsetError> {
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();

        if names.contains(&ALL) {
            self.everything_on = true;
            for toolset in self.toolsets.values_mut() {
                toolset.enabled = true;
            }
            return Ok(());
        }

        for name in names {
            self.enable_toolset(name)?;
        }
        Ok(())
    }

    pub fn enable_toolset(&mut self, name: &str) -> Result<(), ToolsetError> {
        let toolset = self
            .toolsets
            .get_mut(name)
            .ok_or_else(|| ToolsetError::UnknownToolset(name.to_string()))?;
        toolset.enabled = true;
        Ok(())
    }

    /// Active tools across all enabled toolsets.
    pub fn active_tools(&self) -> Vec<ServerTool> {
        self.toolsets
            .values()
            .flat_map(Toolset::active_tools)
            .collect()
    }
}

// =============================================================================
// Resource handlers
// =============================================================================

/// Kubernetes object kinds this server exposes tools for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    Pod,
    Deployment,
    Service,
    ConfigMap,
    Namespace,
    Node,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        Self::Pod,
        Self::Deployment,
        Self::Service,
        Self::ConfigMap,
        Self::Namespace,
        Self::Node,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::Service => "service",
            Self::ConfigMap => "configmap",
            Self::Namespace => "namespace",
            Self::Node => "node",
        }
    }

    /// Resolve a list of names; `"all"` anywhere selects every type.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<Self>, ToolsetError> {
        let mut types = BTreeSet::new();
        for name in names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case(ALL) {
                return Ok(Self::ALL.into_iter().collect());
            }
            types.insert(name.parse()?);
        }
        Ok(types)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ToolsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pod" | "pods" => Ok(Self::Pod),
            "deployment" | "deployments" => Ok(Self::Deployment),
            "service" | "services" => Ok(Self::Service),
            "configmap" | "configmaps" => Ok(Self::ConfigMap),
            "namespace" | "namespaces" => Ok(Self::Namespace),
            "node" | "nodes" => Ok(Self::Node),
            _ => Err(ToolsetError::UnknownResourceType(s.to_string())),
        }
    }
}

/// Registers one resource kind's tools into a toolset.
pub trait ResourceHandler: Send + Sync + fmt::Debug {
    fn register_tools(&self, toolset: &mut Toolset);
}

/// Resource handlers keyed by resource type, iterated in declaration order.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    handlers: BTreeMap<ResourceType, Box<dyn ResourceHandler>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ResourceType, handler: impl ResourceHandler + 'static) {
        self.register_boxed(kind, Box::new(handler));
    }

    pub fn register_boxed(&mut self, kind: ResourceType, handler: Box<dyn ResourceHandler>) {
        self.handlers.insert(kind, handler);
    }

    pub fn handler(&self, kind: ResourceType) -> Option<&dyn ResourceHandler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }

    pub fn handlers(&self) -> impl Iterator<Item = (ResourceType, &dyn ResourceHandler)> {
        self.handlers.iter().map(|(kind, h)| (*kind, h.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;

    fn dummy(name: &'static str) -> ServerTool {
        ServerTool::new(
            Tool::new(name, "test tool", Arc::new(JsonObject::new())),
            move |_args| async move { Ok(CallToolResult::success(vec![Content::text(name)])) },
        )
    }

    fn names(tools: &[ServerTool]) -> Vec<&str> {
        tools.iter().map(ServerTool::name).collect()
    }

    fn sample(name: &str) -> Toolset {
        let mut toolset = Toolset::new(name, "sample");
        toolset
            .add_read_tool(dummy("get_thing"))
            .add_write_tool(dummy("delete_thing"));
        toolset
    }

    #[test]
    fn test_disabled_toolset_has_no_active_tools() {
        let toolset = sample("things");
        assert!(toolset.active_tools().is_empty());
        assert_eq!(
            names(&toolset.available_tools()),
            vec!["get_thing", "delete_thing"]
        );
    }

    #[test]
    fn test_read_only_toolset_drops_write_tools() {
        let mut toolset = sample("things");
        toolset.enabled = true;
        toolset.set_read_only();
        assert_eq!(names(&toolset.active_tools()), vec!["get_thing"]);

        toolset.add_write_tool(dummy("scale_thing"));
        assert!(!names(&toolset.available_tools()).contains(&"scale_thing"));
    }

    #[test]
    fn test_group_read_only_applies_to_added_toolsets() {
        let mut group = ToolsetGroup::new(true);
        group.add_toolset(sample("things"));
        group.enable_toolsets(&["things"]).unwrap();
        assert!(group.toolset("things").unwrap().is_read_only());
        assert_eq!(names(&group.active_tools()), vec!["get_thing"]);
    }

    #[test]
    fn test_enable_all_anywhere_in_list() {
        let mut group = ToolsetGroup::new(false);
        group.add_toolset(sample("a"));
        group.add_toolset(sample("b"));
        group.enable_toolsets(&["a", "all"]).unwrap();
        assert!(group.is_enabled("a"));
        assert!(group.is_enabled("b"));
        assert!(group.is_enabled("not-registered"));
        assert_eq!(group.active_tools().len(), 4);
    }

    #[test]
    fn test_enable_unknown_toolset_fails() {
        let mut group = ToolsetGroup::new(false);
        group.add_toolset(sample("a"));
        let err = group.enable_toolsets(&["a", "missing"]).unwrap_err();
        assert_eq!(err.to_string(), "toolset missing does not exist");
        assert!(group.is_enabled("a"));
        assert!(!group.is_enabled("missing"));
    }

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!("Pods".parse::<ResourceType>().unwrap(), ResourceType::Pod);
        assert_eq!(
            "configmap".parse::<ResourceType>().unwrap(),
            ResourceType::ConfigMap
        );
        assert_eq!(
            "secrets".parse::<ResourceType>().unwrap_err().to_string(),
            "unknown resource type: secrets"
        );
    }

    #[test]
    fn test_resource_type_resolve() {
        let all = ResourceType::resolve(&["pods", "ALL"]).unwrap();
        assert_eq!(all.len(), ResourceType::ALL.len());

        let some = ResourceType::resolve(&["nodes", " pods ", ""]).unwrap();
        assert_eq!(
            some.into_iter().collect::<Vec<_>>(),
            vec![ResourceType::Pod, ResourceType::Node]
        );
    }

    #[tokio::test]
    async fn test_server_tool_dispatch() {
        let tool = dummy("echo");
        let result = tool.call(JsonObject::new()).await.unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
