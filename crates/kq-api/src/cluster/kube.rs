//! kube-backed control-plane client.
//!
//! Every call is wrapped in a bounded timeout: an unbounded control-plane
//! call would tie up a request-serving slot indefinitely.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Node, PersistentVolume, Pod, Service};
use kube::Client;
use kube::api::{Api, ListParams, LogParams};
use tokio::time::timeout;

use super::{ClusterClient, ClusterError, ClusterResult};

/// Control-plane client backed by the ambient kubeconfig or in-cluster
/// service account.
pub struct KubeCluster {
    client: Client,
    call_timeout: Duration,
}

impl KubeCluster {
    /// Connect using the default client inference (kubeconfig, then
    /// in-cluster environment). Fails fast so a misconfigured process never
    /// starts serving.
    pub async fn connect(call_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self {
            client,
            call_timeout,
        })
    }

    fn all<K>(&self) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::ClusterResourceScope>,
        K::DynamicType: Default,
    {
        Api::all(self.client.clone())
    }

    fn scoped<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> ClusterResult<T>
    where
        F: Future<Output = Result<T, kube::Error>> + Send,
    {
        match timeout(self.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_kube_error(e)),
            Err(_) => Err(ClusterError::Timeout),
        }
    }
}

fn map_kube_error(e: kube::Error) -> ClusterError {
    match e {
        kube::Error::Api(response) if response.code == 404 => ClusterError::NotFound,
        other => ClusterError::Api(other.to_string()),
    }
}

#[async_trait]
impl ClusterClient for KubeCluster {
    async fn list_namespaces(&self) -> ClusterResult<Vec<Namespace>> {
        let api: Api<Namespace> = self.all();
        let list = self.bounded(api.list(&ListParams::default())).await?;
        Ok(list.items)
    }

    async fn list_nodes(&self) -> ClusterResult<Vec<Node>> {
        let api: Api<Node> = self.all();
        let list = self.bounded(api.list(&ListParams::default())).await?;
        Ok(list.items)
    }

    async fn list_pods(&self, namespace: Option<&str>) -> ClusterResult<Vec<Pod>> {
        let api: Api<Pod> = self.scoped(namespace);
        let list = self.bounded(api.list(&ListParams::default())).await?;
        Ok(list.items)
    }

    async fn list_deployments(&self, namespace: Option<&str>) -> ClusterResult<Vec<Deployment>> {
        let api: Api<Deployment> = self.scoped(namespace);
        let list = self.bounded(api.list(&ListParams::default())).await?;
        Ok(list.items)
    }

    async fn list_services(&self, namespace: Option<&str>) -> ClusterResult<Vec<Service>> {
        let api: Api<Service> = self.scoped(namespace);
        let list = self.bounded(api.list(&ListParams::default())).await?;
        Ok(list.items)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod> {
        let api: Api<Pod> = self.scoped(Some(namespace));
        self.bounded(api.get(name)).await
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment> {
        let api: Api<Deployment> = self.scoped(Some(namespace));
        self.bounded(api.get(name)).await
    }

    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service> {
        let api: Api<Service> = self.scoped(Some(namespace));
        self.bounded(api.get(name)).await
    }

    async fn get_persistent_volume(&self, name: &str) -> ClusterResult<PersistentVolume> {
        let api: Api<PersistentVolume> = self.all();
        self.bounded(api.get(name)).await
    }

    async fn pod_logs(&self, namespace: &str, name: &str) -> ClusterResult<String> {
        let api: Api<Pod> = self.scoped(Some(namespace));
        self.bounded(api.logs(name, &LogParams::default())).await
    }
}
