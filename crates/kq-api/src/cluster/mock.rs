//! Mock cluster for testing.
//!
//! Holds typed resource objects in memory so dispatch and route tests run
//! without a control plane. Supports injecting a faulty namespace to
//! exercise the non-404 abort path in the locator.

use std::collections::HashMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Node, PersistentVolume, Pod, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::{ClusterClient, ClusterError, ClusterResult};

/// In-memory scripted cluster.
#[derive(Default)]
pub struct MockCluster {
    namespaces: Vec<String>,
    nodes: Vec<Node>,
    pods: Vec<Pod>,
    deployments: Vec<Deployment>,
    services: Vec<Service>,
    persistent_volumes: Vec<PersistentVolume>,
    /// Keyed by (namespace, pod name).
    logs: HashMap<(String, String), String>,
    /// Lookups in these namespaces fail with a non-404 fault.
    broken_namespaces: Vec<String>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, name: &str) -> Self {
        self.namespaces.push(name.to_string());
        self
    }

    pub fn node(mut self, name: &str) -> Self {
        self.nodes.push(Node {
            metadata: named(None, name),
            ..Default::default()
        });
        self
    }

    pub fn pod(mut self, pod: Pod) -> Self {
        self.pods.push(pod);
        self
    }

    pub fn deployment(mut self, deployment: Deployment) -> Self {
        self.deployments.push(deployment);
        self
    }

    pub fn service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn persistent_volume(mut self, pv: PersistentVolume) -> Self {
        self.persistent_volumes.push(pv);
        self
    }

    pub fn pod_log(mut self, namespace: &str, name: &str, text: &str) -> Self {
        self.logs
            .insert((namespace.to_string(), name.to_string()), text.to_string());
        self
    }

    pub fn broken_namespace(mut self, name: &str) -> Self {
        self.broken_namespaces.push(name.to_string());
        self
    }

    fn check_namespace(&self, namespace: &str) -> ClusterResult<()> {
        if self.broken_namespaces.iter().any(|ns| ns == namespace) {
            return Err(ClusterError::Api(format!(
                "injected fault in namespace '{namespace}'"
            )));
        }
        Ok(())
    }
}

/// Metadata with namespace and name set, everything else default.
pub fn named(namespace: Option<&str>, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        ..Default::default()
    }
}

fn in_namespace(meta: &ObjectMeta, namespace: Option<&str>) -> bool {
    match namespace {
        Some(ns) => meta.namespace.as_deref() == Some(ns),
        None => true,
    }
}

fn find<'a, T>(
    items: &'a [T],
    meta: impl Fn(&T) -> &ObjectMeta,
    namespace: &str,
    name: &str,
) -> ClusterResult<&'a T> {
    items
        .iter()
        .find(|item| {
            let m = meta(item);
            m.namespace.as_deref() == Some(namespace) && m.name.as_deref() == Some(name)
        })
        .ok_or(ClusterError::NotFound)
}

#[async_trait]
impl ClusterClient for MockCluster {
    async fn list_namespaces(&self) -> ClusterResult<Vec<Namespace>> {
        Ok(self
            .namespaces
            .iter()
            .map(|name| Namespace {
                metadata: named(None, name),
                ..Default::default()
            })
            .collect())
    }

    async fn list_nodes(&self) -> ClusterResult<Vec<Node>> {
        Ok(self.nodes.clone())
    }

    async fn list_pods(&self, namespace: Option<&str>) -> ClusterResult<Vec<Pod>> {
        Ok(self
            .pods
            .iter()
            .filter(|p| in_namespace(&p.metadata, namespace))
            .cloned()
            .collect())
    }

    async fn list_deployments(&self, namespace: Option<&str>) -> ClusterResult<Vec<Deployment>> {
        Ok(self
            .deployments
            .iter()
            .filter(|d| in_namespace(&d.metadata, namespace))
            .cloned()
            .collect())
    }

    async fn list_services(&self, namespace: Option<&str>) -> ClusterResult<Vec<Service>> {
        Ok(self
            .services
            .iter()
            .filter(|s| in_namespace(&s.metadata, namespace))
            .cloned()
            .collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod> {
        self.check_namespace(namespace)?;
        find(&self.pods, |p| &p.metadata, namespace, name).cloned()
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment> {
        self.check_namespace(namespace)?;
        find(&self.deployments, |d| &d.metadata, namespace, name).cloned()
    }

    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service> {
        self.check_namespace(namespace)?;
        find(&self.services, |s| &s.metadata, namespace, name).cloned()
    }

    async fn get_persistent_volume(&self, name: &str) -> ClusterResult<PersistentVolume> {
        self.persistent_volumes
            .iter()
            .find(|pv| pv.metadata.name.as_deref() == Some(name))
            .cloned()
            .ok_or(ClusterError::NotFound)
    }

    async fn pod_logs(&self, namespace: &str, name: &str) -> ClusterResult<String> {
        self.check_namespace(namespace)?;
        self.logs
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or(ClusterError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_pod_by_namespace_and_name() {
        let cluster = MockCluster::new().namespace("default").pod(Pod {
            metadata: named(Some("default"), "web-0"),
            ..Default::default()
        });

        assert!(cluster.get_pod("default", "web-0").await.is_ok());
        assert!(matches!(
            cluster.get_pod("default", "web-1").await,
            Err(ClusterError::NotFound)
        ));
        assert!(matches!(
            cluster.get_pod("other", "web-0").await,
            Err(ClusterError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_pods_scoped_and_cluster_wide() {
        let cluster = MockCluster::new()
            .pod(Pod {
                metadata: named(Some("default"), "web-0"),
                ..Default::default()
            })
            .pod(Pod {
                metadata: named(Some("prod"), "api-0"),
                ..Default::default()
            });

        assert_eq!(cluster.list_pods(None).await.unwrap().len(), 2);
        assert_eq!(cluster.list_pods(Some("prod")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn broken_namespace_injects_fault() {
        let cluster = MockCluster::new().broken_namespace("kube-system");
        assert!(matches!(
            cluster.get_pod("kube-system", "anything").await,
            Err(ClusterError::Api(_))
        ));
    }
}
