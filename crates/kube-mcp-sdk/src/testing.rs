//! In-memory [`ClusterClient`] for tests.
//!
//! `InMemoryCluster` holds typed objects keyed by namespace and name, evaluates
//! the equality-based label selectors and the `metadata.name` /
//! `metadata.namespace` field selectors, and records the mutations tools make so
//! tests can assert on them. Objects are built with the fixture helpers at the
//! bottom of this module.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Service, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{List, ListableResource};
use kube::{Resource, ResourceExt};

use crate::cluster::{ClusterClient, LogOptions, Selectors};
use crate::error::{ClusterError, ClusterResult};

type Key = (String, String);

/// A pod deletion the cluster received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedPod {
    pub namespace: String,
    pub name: String,
    pub grace_period_seconds: Option<u32>,
}

/// A log read the cluster served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    pub namespace: String,
    pub name: String,
    pub options: LogOptions,
}

#[derive(Debug, Default)]
struct State {
    pods: BTreeMap<Key, Pod>,
    pod_logs: HashMap<Key, String>,
    deployments: BTreeMap<Key, Deployment>,
    services: BTreeMap<Key, Service>,
    config_maps: BTreeMap<Key, ConfigMap>,
    namespaces: BTreeMap<String, Namespace>,
    nodes: BTreeMap<String, Node>,
    deleted_pods: Vec<DeletedPod>,
    log_requests: Vec<LogRequest>,
}

/// Fake cluster backed by in-memory maps.
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    state: RwLock<State>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(self, pod: Pod) -> Self {
        self.write().pods.insert(namespaced_key(&pod), pod);
        self
    }

    /// Canned log output for a pod, returned by `pod_logs`.
    pub fn with_pod_logs(self, namespace: &str, name: &str, logs: impl Into<String>) -> Self {
        self.write()
            .pod_logs
            .insert(key(namespace, name), logs.into());
        self
    }

    pub fn with_deployment(self, deployment: Deployment) -> Self {
        self.write()
            .deployments
            .insert(namespaced_key(&deployment), deployment);
        self
    }

    pub fn with_service(self, service: Service) -> Self {
        self.write().services.insert(namespaced_key(&service), service);
        self
    }

    pub fn with_config_map(self, config_map: ConfigMap) -> Self {
        self.write()
            .config_maps
            .insert(namespaced_key(&config_map), config_map);
        self
    }

    pub fn with_namespace(self, namespace: Namespace) -> Self {
        self.write()
            .namespaces
            .insert(namespace.name_any(), namespace);
        self
    }

    pub fn with_node(self, node: Node) -> Self {
        self.write().nodes.insert(node.name_any(), node);
        self
    }

    pub fn contains_pod(&self, namespace: &str, name: &str) -> bool {
        self.read().pods.contains_key(&key(namespace, name))
    }

    /// Current `spec.replicas` of a deployment.
    pub fn deployment_replicas(&self, namespace: &str, name: &str) -> Option<i32> {
        self.read()
            .deployments
            .get(&key(namespace, name))
            .and_then(|d| d.spec.as_ref())
            .and_then(|spec| spec.replicas)
    }

    pub fn deleted_pods(&self) -> Vec<DeletedPod> {
        self.read().deleted_pods.clone()
    }

    pub fn log_requests(&self) -> Vec<LogRequest> {
        self.read().log_requests.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn namespaced_key<K: Resource>(obj: &K) -> Key {
    (
        obj.namespace().unwrap_or_else(|| "default".to_string()),
        obj.name_any(),
    )
}

fn get_namespaced<K: Clone>(
    map: &BTreeMap<Key, K>,
    kind: &'static str,
    namespace: &str,
    name: &str,
) -> ClusterResult<K> {
    map.get(&key(namespace, name))
        .cloned()
        .ok_or_else(|| ClusterError::not_found(kind, name))
}

/// An empty namespace lists across all namespaces.
fn list_namespaced<K>(
    map: &BTreeMap<Key, K>,
    namespace: &str,
    selectors: &Selectors,
) -> ClusterResult<List<K>>
where
    K: Resource + ListableResource + Clone,
{
    let filter = Filter::parse(selectors)?;
    let items = map
        .iter()
        .filter(|((ns, _), _)| namespace.is_empty() || ns == namespace)
        .map(|(_, obj)| obj)
        .filter(|obj| filter.matches(*obj))
        .cloned()
        .collect();
    Ok(List {
        items,
        metadata: Default::default(),
    })
}

fn list_cluster_scoped<K>(
    map: &BTreeMap<String, K>,
    selectors: &Selectors,
) -> ClusterResult<List<K>>
where
    K: Resource + ListableResource + Clone,
{
    let filter = Filter::parse(selectors)?;
    let items = map.values().filter(|obj| filter.matches(*obj)).cloned().collect();
    Ok(List {
        items,
        metadata: Default::default(),
    })
}

#[async_trait]
impl ClusterClient for InMemoryCluster {
    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod> {
        get_namespaced(&self.read().pods, "pods", namespace, name)
    }

    async fn list_pods(&self, namespace: &str, selectors: &Selectors) -> ClusterResult<List<Pod>> {
        list_namespaced(&self.read().pods, namespace, selectors)
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        options: &LogOptions,
    ) -> ClusterResult<String> {
        let mut state = self.write();
        if !state.pods.contains_key(&key(namespace, name)) {
            return Err(ClusterError::not_found("pods", name));
        }
        state.log_requests.push(LogRequest {
            namespace: namespace.to_string(),
            name: name.to_string(),
            options: options.clone(),
        });

        let logs = state
            .pod_logs
            .get(&key(namespace, name))
            .cloned()
            .unwrap_or_default();
        Ok(match options.tail_lines {
            Some(tail) if tail >= 0 => tail_lines(&logs, tail as usize),
            _ => logs,
        })
    }

    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: Option<u32>,
    ) -> ClusterResult<()> {
        let mut state = self.write();
        if state.pods.remove(&key(namespace, name)).is_none() {
            return Err(ClusterError::not_found("pods", name));
        }
        state.deleted_pods.push(DeletedPod {
            namespace: namespace.to_string(),
            name: name.to_string(),
            grace_period_seconds,
        });
        Ok(())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment> {
        get_namespaced(&self.read().deployments, "deployments.apps", namespace, name)
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Deployment>> {
        list_namespaced(&self.read().deployments, namespace, selectors)
    }

    async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> ClusterResult<Deployment> {
        let mut state = self.write();
        let deployment = state
            .deployments
            .get_mut(&key(namespace, name))
            .ok_or_else(|| ClusterError::not_found("deployments.apps", name))?;
        deployment.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
        Ok(deployment.clone())
    }

    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service> {
        get_namespaced(&self.read().services, "services", namespace, name)
    }

    async fn list_services(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Service>> {
        list_namespaced(&self.read().services, namespace, selectors)
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> ClusterResult<ConfigMap> {
        get_namespaced(&self.read().config_maps, "configmaps", namespace, name)
    }

    async fn list_config_maps(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<ConfigMap>> {
        list_namespaced(&self.read().config_maps, namespace, selectors)
    }

    async fn get_namespace(&self, name: &str) -> ClusterResult<Namespace> {
        self.read()
            .namespaces
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::not_found("namespaces", name))
    }

    async fn list_namespaces(&self, selectors: &Selectors) -> ClusterResult<List<Namespace>> {
        list_cluster_scoped(&self.read().namespaces, selectors)
    }

    async fn get_node(&self, name: &str) -> ClusterResult<Node> {
        self.read()
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::not_found("nodes", name))
    }

    async fn list_nodes(&self, selectors: &Selectors) -> ClusterResult<List<Node>> {
        list_cluster_scoped(&self.read().nodes, selectors)
    }
}

fn tail_lines(logs: &str, count: usize) -> String {
    let lines: Vec<&str> = logs.lines().collect();
    let start = lines.len().saturating_sub(count);
    let mut tail = lines[start..].join("\n");
    if !tail.is_empty() && logs.ends_with('\n') {
        tail.push('\n');
    }
    tail
}

// =============================================================================
// Selectors
// =============================================================================

#[derive(Debug)]
enum LabelRequirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    NotExists(String),
}

#[derive(Debug, Clone, Copy)]
enum FieldKey {
    Name,
    Namespace,
}

#[derive(Debug)]
struct FieldRequirement {
    key: FieldKey,
    value: String,
    negated: bool,
}

#[derive(Debug, Default)]
struct Filter {
    labels: Vec<LabelRequirement>,
    fields: Vec<FieldRequirement>,
}

impl Filter {
    fn parse(selectors: &Selectors) -> ClusterResult<Self> {
        let mut filter = Self::default();
        for term in terms(selectors.label()) {
            filter.labels.push(parse_label_term(term)?);
        }
        for term in terms(selectors.field()) {
            filter.fields.push(parse_field_term(term)?);
        }
        Ok(filter)
    }

    fn matches<K: Resource>(&self, obj: &K) -> bool {
        let labels = obj.labels();
        let labels_match = self.labels.iter().all(|req| match req {
            LabelRequirement::Equals(k, v) => labels.get(k) == Some(v),
            LabelRequirement::NotEquals(k, v) => labels.get(k) != Some(v),
            LabelRequirement::Exists(k) => labels.contains_key(k),
            LabelRequirement::NotExists(k) => !labels.contains_key(k),
        });

        let fields_match = self.fields.iter().all(|req| {
            let actual = match req.key {
                FieldKey::Name => obj.name_any(),
                FieldKey::Namespace => obj.namespace().unwrap_or_default(),
            };
            (actual == req.value) != req.negated
        });

        labels_match && fields_match
    }
}

fn terms(selector: Option<&str>) -> impl Iterator<Item = &str> {
    selector
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
}

/// Split `k!=v`, `k==v` or `k=v` into key, value and negation.
fn split_equality(term: &str) -> Option<(&str, &str, bool)> {
    if let Some((k, v)) = term.split_once("!=") {
        return Some((k.trim(), v.trim(), true));
    }
    if let Some((k, v)) = term.split_once("==") {
        return Some((k.trim(), v.trim(), false));
    }
    term.split_once('=').map(|(k, v)| (k.trim(), v.trim(), false))
}

fn parse_label_term(term: &str) -> ClusterResult<LabelRequirement> {
    if term.contains(' ') || term.contains('(') {
        return Err(ClusterError::invalid_selector(format!(
            "unsupported label selector: {term}"
        )));
    }
    if let Some((k, v, negated)) = split_equality(term) {
        if k.is_empty() {
            return Err(ClusterError::invalid_selector(format!(
                "empty label key in: {term}"
            )));
        }
        return Ok(if negated {
            LabelRequirement::NotEquals(k.to_string(), v.to_string())
        } else {
            LabelRequirement::Equals(k.to_string(), v.to_string())
        });
    }
    match term.strip_prefix('!') {
        Some(k) => Ok(LabelRequirement::NotExists(k.to_string())),
        None => Ok(LabelRequirement::Exists(term.to_string())),
    }
}

fn parse_field_term(term: &str) -> ClusterResult<FieldRequirement> {
    let (k, v, negated) = split_equality(term).ok_or_else(|| {
        ClusterError::invalid_selector(format!("invalid field selector: {term}"))
    })?;
    let key = match k {
        "metadata.name" => FieldKey::Name,
        "metadata.namespace" => FieldKey::Namespace,
        other => {
            return Err(ClusterError::invalid_selector(format!(
                "field label not supported: {other}"
            )))
        }
    };
    Ok(FieldRequirement {
        key,
        value: v.to_string(),
        negated,
    })
}

// =============================================================================
// Fixtures
// =============================================================================

fn meta(namespace: Option<&str>, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        ..ObjectMeta::default()
    }
}

pub fn pod(namespace: &str, name: &str) -> Pod {
    Pod {
        metadata: meta(Some(namespace), name),
        ..Pod::default()
    }
}

pub fn deployment(namespace: &str, name: &str, replicas: i32) -> Deployment {
    Deployment {
        metadata: meta(Some(namespace), name),
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}

pub fn service(namespace: &str, name: &str) -> Service {
    Service {
        metadata: meta(Some(namespace), name),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}

pub fn config_map(namespace: &str, name: &str, data: &[(&str, &str)]) -> ConfigMap {
    ConfigMap {
        metadata: meta(Some(namespace), name),
        data: Some(
            data.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        ..ConfigMap::default()
    }
}

pub fn namespace(name: &str) -> Namespace {
    Namespace {
        metadata: meta(None, name),
        ..Namespace::default()
    }
}

pub fn node(name: &str) -> Node {
    Node {
        metadata: meta(None, name),
        ..Node::default()
    }
}

/// Attach labels to any fixture.
pub fn labeled<K: Resource>(mut obj: K, labels: &[(&str, &str)]) -> K {
    obj.labels_mut()
        .extend(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    obj
}
