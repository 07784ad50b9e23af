//! Read-only cluster control-plane access.
//!
//! The `ClusterClient` trait is the complete surface this system may touch:
//! list/get/logs over a handful of core and apps resources, nothing that
//! mutates. Production uses the kube-backed implementation; tests use the
//! in-memory mock.

pub mod kube;
pub mod mock;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Node, PersistentVolume, Pod, Service};

/// Control-plane failure, with resource absence split out because it is an
/// expected outcome rather than a fault.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("resource not found")]
    NotFound,

    #[error("control plane error: {0}")]
    Api(String),

    #[error("control plane call timed out")]
    Timeout,
}

/// Convenience alias.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Read-only queries against the cluster control plane.
///
/// `namespace: None` on the list operations means cluster-wide.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn list_namespaces(&self) -> ClusterResult<Vec<Namespace>>;
    async fn list_nodes(&self) -> ClusterResult<Vec<Node>>;
    async fn list_pods(&self, namespace: Option<&str>) -> ClusterResult<Vec<Pod>>;
    async fn list_deployments(&self, namespace: Option<&str>) -> ClusterResult<Vec<Deployment>>;
    async fn list_services(&self, namespace: Option<&str>) -> ClusterResult<Vec<Service>>;
    async fn get_pod(&self, namespace: &str, name: &str) -> ClusterResult<Pod>;
    async fn get_deployment(&self, namespace: &str, name: &str) -> ClusterResult<Deployment>;
    async fn get_service(&self, namespace: &str, name: &str) -> ClusterResult<Service>;
    async fn get_persistent_volume(&self, name: &str) -> ClusterResult<PersistentVolume>;
    async fn pod_logs(&self, namespace: &str, name: &str) -> ClusterResult<String>;
}
