//! Namespace-scoped resource location.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};

use crate::cluster::{ClusterClient, ClusterError, ClusterResult};

/// A located object. Only the kinds with single-object handlers are
/// locatable; everything else answers through list operations.
pub enum Found {
    Pod(Box<Pod>),
    Deployment(Box<Deployment>),
    Service(Box<Service>),
}

impl Found {
    /// Full human-readable serialization of the object.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        let yaml = match self {
            Found::Pod(pod) => serde_yaml::to_string(pod)?,
            Found::Deployment(dep) => serde_yaml::to_string(dep)?,
            Found::Service(svc) => serde_yaml::to_string(svc)?,
        };
        Ok(yaml)
    }
}

/// Find the single named resource of `kind`, returning it with the
/// namespace it lives in.
///
/// With an explicit namespace only that namespace is probed. Otherwise every
/// namespace is probed in listing order and the first hit wins; a name that
/// coincidentally exists in several namespaces resolves to whichever
/// namespace the control plane listed first. Absence in one namespace is
/// not an error; any other fault aborts the search. Exhausting the list is
/// the expected `Ok(None)` outcome, rendered by callers as a "not found"
/// sentence.
pub async fn locate(
    cluster: &dyn ClusterClient,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
) -> ClusterResult<Option<(Found, String)>> {
    let namespaces: Vec<String> = match namespace {
        Some(ns) => vec![ns.to_string()],
        None => cluster
            .list_namespaces()
            .await?
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect(),
    };

    for ns in namespaces {
        let found = match kind {
            "pod" => cluster
                .get_pod(&ns, name)
                .await
                .map(|pod| Found::Pod(Box::new(pod))),
            "deployment" => cluster
                .get_deployment(&ns, name)
                .await
                .map(|dep| Found::Deployment(Box::new(dep))),
            "service" => cluster
                .get_service(&ns, name)
                .await
                .map(|svc| Found::Service(Box::new(svc))),
            _ => return Ok(None),
        };

        match found {
            Ok(obj) => return Ok(Some((obj, ns))),
            Err(ClusterError::NotFound) => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::mock::{MockCluster, named};

    fn pod(ns: &str, name: &str) -> Pod {
        Pod {
            metadata: named(Some(ns), name),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn finds_resource_across_namespaces() {
        let cluster = MockCluster::new()
            .namespace("default")
            .namespace("prod")
            .pod(pod("prod", "web-0"));

        let (found, ns) = locate(&cluster, "pod", "web-0", None)
            .await
            .unwrap()
            .expect("should find pod");
        assert_eq!(ns, "prod");
        assert!(matches!(found, Found::Pod(_)));
    }

    #[tokio::test]
    async fn first_namespace_in_listing_order_wins() {
        let cluster = MockCluster::new()
            .namespace("alpha")
            .namespace("beta")
            .pod(pod("alpha", "web-0"))
            .pod(pod("beta", "web-0"));

        let (_, ns) = locate(&cluster, "pod", "web-0", None)
            .await
            .unwrap()
            .expect("should find pod");
        assert_eq!(ns, "alpha");
    }

    #[tokio::test]
    async fn explicit_namespace_scopes_the_search() {
        let cluster = MockCluster::new()
            .namespace("default")
            .namespace("prod")
            .pod(pod("prod", "web-0"));

        let result = locate(&cluster, "pod", "web-0", Some("default"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn exhausted_search_is_none_not_error() {
        let cluster = MockCluster::new().namespace("default").namespace("prod");
        let result = locate(&cluster, "pod", "ghost", None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn non_404_fault_aborts_the_search() {
        let cluster = MockCluster::new()
            .namespace("kube-system")
            .namespace("prod")
            .broken_namespace("kube-system")
            .pod(pod("prod", "web-0"));

        let result = locate(&cluster, "pod", "web-0", None).await;
        assert!(matches!(result, Err(ClusterError::Api(_))));
    }

    #[tokio::test]
    async fn unlocatable_kind_is_none() {
        let cluster = MockCluster::new().namespace("default");
        let result = locate(&cluster, "configmap", "settings", None)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
