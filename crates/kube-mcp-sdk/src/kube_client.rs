//! [`ClusterClient`] implementation over a live `kube::Client`.

use std::fmt;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Service};
use k8s_openapi::{List, ListableResource};
use kube::api::{Api, DeleteParams, ListParams, LogParams, ObjectList, PostParams};
use kube::Client;

use crate::cluster::{ClusterClient, LogOptions, Selectors};
use crate::error::ClusterResult;

/// Production cluster client. Cheap to clone; `kube::Client` is reference counted.
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeClusterClient")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubeClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn list_params(selectors: &Selectors) -> ListParams {
    let mut params = ListParams::default();
    if let Some(field) = selectors.field() {
        params = params.fields(field);
    }
    if let Some(label) = selectors.label() {
        params = params.labels(label);
    }
    params
}

/// Re-wrap a kube list so it serializes with `apiVersion`/`kind` (e.g. `PodList`).
fn into_list<K: ListableResource + Clone>(list: ObjectList<K>) -> List<K> {
    List {
        items: list.items,
        metadata: list.metadata,
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod> {
        Ok(self.pods(namespace).get(name).await?)
    }

    async fn list_pods(&self, namespace: &str, selectors: &Selectors) -> ClusterResult<List<Pod>> {
        let pods = self.pods(namespace).list(&list_params(selectors)).await?;
        Ok(into_list(pods))
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        options: &LogOptions,
    ) -> ClusterResult<String> {
        let params = LogParams {
            container: options.container.clone(),
            tail_lines: options.tail_lines,
            previous: options.previous,
            ..LogParams::default()
        };
        Ok(self.pods(namespace).logs(name, &params).await?)
    }

    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: Option<u32>,
    ) -> ClusterResult<()> {
        let params = DeleteParams {
            grace_period_seconds,
            ..DeleteParams::default()
        };
        // The API answers with either the terminating pod or a Status; both mean accepted.
        self.pods(namespace).delete(name, &params).await?;
        Ok(())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment> {
        Ok(self.deployments(namespace).get(name).await?)
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Deployment>> {
        let deployments = self
            .deployments(namespace)
            .list(&list_params(selectors))
            .await?;
        Ok(into_list(deployments))
    }

    async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> ClusterResult<Deployment> {
        let api = self.deployments(namespace);
        let mut deployment = api.get(name).await?;
        deployment.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
        Ok(api
            .replace(name, &PostParams::default(), &deployment)
            .await?)
    }

    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn list_services(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<Service>> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        Ok(into_list(api.list(&list_params(selectors)).await?))
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> ClusterResult<ConfigMap> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn list_config_maps(
        &self,
        namespace: &str,
        selectors: &Selectors,
    ) -> ClusterResult<List<ConfigMap>> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        Ok(into_list(api.list(&list_params(selectors)).await?))
    }

    async fn get_namespace(&self, name: &str) -> ClusterResult<Namespace> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(api.get(name).await?)
    }

    async fn list_namespaces(&self, selectors: &Selectors) -> ClusterResult<List<Namespace>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        Ok(into_list(api.list(&list_params(selectors)).await?))
    }

    async fn get_node(&self, name: &str) -> ClusterResult<Node> {
        let api: Api<Node> = Api::all(self.client.clone());
        Ok(api.get(name).await?)
    }

    async fn list_nodes(&self, selectors: &Selectors) -> ClusterResult<List<Node>> {
        let api: Api<Node> = Api::all(self.client.clone());
        Ok(into_list(api.list(&list_params(selectors)).await?))
    }
}
