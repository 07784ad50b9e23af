//! Fallback synthesis for queries no canonical action matched.
//!
//! The model proposes a single read-only query in a closed grammar
//! (`AdHocQuery`); this module executes it against the cluster trait and
//! renders the outcome. Nothing the model says is ever evaluated as code,
//! and every failure on this path collapses to one generic sentence.

use kq_intent::{AdHocOp, AdHocQuery, ResourceKind, simplify_name};

use crate::cluster::{ClusterClient, ClusterError};
use crate::interpret::QueryInterpreter;

use super::locate::{Found, locate};

/// Sentence rendered when the fallback path cannot produce an answer.
const FALLBACK_FAILED: &str =
    "The requested action could not be performed. Please check the query or try again.";

/// Ask the model for an ad hoc plan and execute it. Never fails: planning
/// errors, execution faults, and unsupported plans all render the same
/// generic sentence.
pub async fn synthesize(
    cluster: &dyn ClusterClient,
    interpreter: &dyn QueryInterpreter,
    query: &str,
) -> String {
    let plan = match interpreter.plan_fallback(query).await {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(error = %e, "fallback planning failed");
            return FALLBACK_FAILED.to_string();
        }
    };

    tracing::debug!(plan = ?plan, "executing fallback plan");
    match execute(cluster, &plan).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, plan = ?plan, "fallback execution failed");
            FALLBACK_FAILED.to_string()
        }
    }
}

async fn execute(cluster: &dyn ClusterClient, plan: &AdHocQuery) -> anyhow::Result<String> {
    let kind = ResourceKind::normalize(&plan.resource);
    let ns = plan.namespace.as_deref();

    match plan.op {
        AdHocOp::List => Ok(list_names(cluster, kind.as_str(), ns).await?.join(", ")),
        AdHocOp::Count => Ok(list_names(cluster, kind.as_str(), ns)
            .await?
            .len()
            .to_string()),
        AdHocOp::Get => {
            let name = required_name(plan)?;
            if kind.as_str() == "persistentvolume" {
                return match cluster.get_persistent_volume(name).await {
                    Ok(pv) => Ok(serde_yaml::to_string(&pv)?),
                    Err(ClusterError::NotFound) => {
                        Ok(format!("PersistentVolume '{name}' not found."))
                    }
                    Err(e) => Err(e.into()),
                };
            }
            match locate(cluster, kind.as_str(), name, ns).await? {
                Some((found, _)) => found.to_yaml(),
                None => Ok(format!("Resource '{name}' not found.")),
            }
        }
        AdHocOp::Logs => {
            let name = required_name(plan)?;
            match locate(cluster, "pod", name, ns).await? {
                Some((Found::Pod(_), found_ns)) => Ok(cluster.pod_logs(&found_ns, name).await?),
                _ => Ok(format!("Pod '{name}' not found in any namespace.")),
            }
        }
    }
}

fn required_name(plan: &AdHocQuery) -> anyhow::Result<&str> {
    plan.name
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("plan op {:?} requires a name", plan.op))
}

/// Names for the listable kinds, simplified where names are generated.
async fn list_names(
    cluster: &dyn ClusterClient,
    kind: &str,
    namespace: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let names = match kind {
        "pod" => cluster
            .list_pods(namespace)
            .await?
            .into_iter()
            .filter_map(|p| p.metadata.name)
            .map(|n| simplify_name(&n))
            .collect(),
        "deployment" => cluster
            .list_deployments(namespace)
            .await?
            .into_iter()
            .filter_map(|d| d.metadata.name)
            .map(|n| simplify_name(&n))
            .collect(),
        "service" => cluster
            .list_services(namespace)
            .await?
            .into_iter()
            .filter_map(|s| s.metadata.name)
            .map(|n| simplify_name(&n))
            .collect(),
        "node" => cluster
            .list_nodes()
            .await?
            .into_iter()
            .filter_map(|n| n.metadata.name)
            .collect(),
        "namespace" => cluster
            .list_namespaces()
            .await?
            .into_iter()
            .filter_map(|n| n.metadata.name)
            .collect(),
        other => anyhow::bail!("resource kind '{other}' is not listable"),
    };
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Pod;

    use crate::cluster::mock::{MockCluster, named};
    use crate::interpret::MockInterpreter;

    fn pod(ns: &str, name: &str) -> Pod {
        Pod {
            metadata: named(Some(ns), name),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_plan_renders_simplified_names() {
        let cluster = MockCluster::new()
            .pod(pod("default", "checkout-5d8f9b7c4a"))
            .pod(pod("default", "cart"));
        let interpreter =
            MockInterpreter::failing().and_fallback(r#"{"op": "list", "resource": "pods"}"#);
        let answer = synthesize(&cluster, &interpreter, "what workloads run here").await;
        assert_eq!(answer, "checkout, cart");
    }

    #[tokio::test]
    async fn count_plan_renders_decimal() {
        let cluster = MockCluster::new().node("a").node("b");
        let interpreter =
            MockInterpreter::failing().and_fallback(r#"{"op": "count", "resource": "node"}"#);
        let answer = synthesize(&cluster, &interpreter, "cluster size?").await;
        assert_eq!(answer, "2");
    }

    #[tokio::test]
    async fn get_plan_renders_yaml() {
        let cluster = MockCluster::new()
            .namespace("prod")
            .pod(pod("prod", "web-0"));
        let interpreter = MockInterpreter::failing()
            .and_fallback(r#"{"op": "get", "resource": "pod", "name": "web-0"}"#);
        let answer = synthesize(&cluster, &interpreter, "show me web-0").await;
        assert!(answer.contains("name: web-0"));
    }

    #[tokio::test]
    async fn logs_plan_returns_text_verbatim() {
        let cluster = MockCluster::new()
            .namespace("prod")
            .pod(pod("prod", "web-0"))
            .pod_log("prod", "web-0", "hello\n");
        let interpreter = MockInterpreter::failing()
            .and_fallback(r#"{"op": "logs", "resource": "pod", "name": "web-0"}"#);
        let answer = synthesize(&cluster, &interpreter, "any recent output from web-0").await;
        assert_eq!(answer, "hello\n");
    }

    #[tokio::test]
    async fn planning_failure_is_the_generic_sentence() {
        let cluster = MockCluster::new();
        let interpreter = MockInterpreter::failing();
        let answer = synthesize(&cluster, &interpreter, "anything").await;
        assert_eq!(answer, FALLBACK_FAILED);
    }

    #[tokio::test]
    async fn unlistable_kind_is_the_generic_sentence() {
        let cluster = MockCluster::new();
        let interpreter =
            MockInterpreter::failing().and_fallback(r#"{"op": "list", "resource": "secrets"}"#);
        let answer = synthesize(&cluster, &interpreter, "list all secrets").await;
        assert_eq!(answer, FALLBACK_FAILED);
    }

    #[tokio::test]
    async fn missing_required_name_is_the_generic_sentence() {
        let cluster = MockCluster::new();
        let interpreter =
            MockInterpreter::failing().and_fallback(r#"{"op": "logs", "resource": "pod"}"#);
        let answer = synthesize(&cluster, &interpreter, "logs please").await;
        assert_eq!(answer, FALLBACK_FAILED);
    }

    #[tokio::test]
    async fn get_miss_is_a_not_found_sentence() {
        let cluster = MockCluster::new().namespace("default");
        let interpreter = MockInterpreter::failing()
            .and_fallback(r#"{"op": "get", "resource": "pod", "name": "ghost"}"#);
        let answer = synthesize(&cluster, &interpreter, "show ghost").await;
        assert_eq!(answer, "Resource 'ghost' not found.");
    }
}
