//! Intent dispatch: routing from canonical actions to read-only cluster
//! queries, rendered as plain-language answers.
//!
//! The dispatcher never fails. Not-found outcomes and unsupported kinds are
//! answers, not errors; control-plane faults are caught at this boundary,
//! logged, and downgraded to a generic sentence.

pub mod fallback;
pub mod locate;

use std::sync::Arc;

use k8s_openapi::api::core::v1::EnvVar;

use kq_intent::{ActionKind, CanonicalIntent, Normalized, RawIntent, simplify_name};

use crate::cluster::ClusterClient;
use crate::interpret::QueryInterpreter;
use locate::{Found, locate};

/// Sentence rendered when a control-plane fault escapes a handler.
const CONTROL_PLANE_FAULT: &str =
    "An error occurred while communicating with the cluster control plane.";

/// Routes canonical intents to handlers over the two process-wide handles.
#[derive(Clone)]
pub struct Dispatcher {
    cluster: Arc<dyn ClusterClient>,
    interpreter: Arc<dyn QueryInterpreter>,
}

impl Dispatcher {
    pub fn new(cluster: Arc<dyn ClusterClient>, interpreter: Arc<dyn QueryInterpreter>) -> Self {
        Self {
            cluster,
            interpreter,
        }
    }

    /// Answer a raw interpreted intent. `query` is the original free text,
    /// carried for the fallback path.
    pub async fn answer(&self, query: &str, raw: RawIntent) -> String {
        match kq_intent::normalize(raw) {
            Normalized::Fallback => {
                tracing::info!("intent not recognized, delegating to fallback synthesizer");
                fallback::synthesize(self.cluster.as_ref(), self.interpreter.as_ref(), query).await
            }
            Normalized::Intent(intent) => self.dispatch(query, intent).await,
        }
    }

    async fn dispatch(&self, query: &str, intent: CanonicalIntent) -> String {
        let result = match &intent.action {
            ActionKind::CountResources => self.count_resources(&intent).await,
            ActionKind::GetStatus => self.get_status(&intent).await,
            ActionKind::ListResources => self.list_resources(&intent).await,
            ActionKind::GetLogs => self.get_logs(&intent).await,
            ActionKind::DescribeResource => self.describe_resource(&intent).await,
            ActionKind::GetResourceDetail => self.get_resource_detail(&intent).await,
            ActionKind::Unknown | ActionKind::Other(_) => {
                tracing::info!(action = ?intent.action, "no handler for action, delegating to fallback synthesizer");
                return fallback::synthesize(
                    self.cluster.as_ref(),
                    self.interpreter.as_ref(),
                    query,
                )
                .await;
            }
        };

        match result {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, action = ?intent.action, "handler failed");
                CONTROL_PLANE_FAULT.to_string()
            }
        }
    }

    /// Cluster-wide count for the closed set of countable kinds.
    async fn count_resources(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let count = match intent.resource_type.as_str() {
            "pod" => self.cluster.list_pods(None).await?.len(),
            "deployment" => self.cluster.list_deployments(None).await?.len(),
            "node" => self.cluster.list_nodes().await?.len(),
            "service" => self.cluster.list_services(None).await?.len(),
            other => {
                return Ok(format!(
                    "Resource type '{other}' is not supported for counting."
                ));
            }
        };
        Ok(count.to_string())
    }

    /// Kind-specific status field of a located resource.
    async fn get_status(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let kind = intent.resource_type.as_str();
        if !matches!(kind, "pod" | "deployment" | "service") {
            return Ok(format!(
                "Resource type '{kind}' is not supported for status retrieval."
            ));
        }
        let Some(name) = intent.resource_name.as_deref() else {
            return Ok("A resource name is required to get status.".into());
        };

        let located = locate(
            self.cluster.as_ref(),
            kind,
            name,
            intent.namespace.as_deref(),
        )
        .await?;

        let answer = match located {
            Some((Found::Pod(pod), ns)) => {
                let phase = pod
                    .status
                    .as_ref()
                    .and_then(|s| s.phase.clone())
                    .unwrap_or_else(|| "Unknown".into());
                format!("The status of pod '{name}' in namespace '{ns}' is '{phase}'.")
            }
            Some((Found::Deployment(dep), ns)) => {
                // The type of the most recently reported condition.
                let status = dep
                    .status
                    .as_ref()
                    .and_then(|s| s.conditions.as_ref())
                    .and_then(|conditions| conditions.last())
                    .map(|c| c.type_.clone())
                    .unwrap_or_else(|| "Unknown".into());
                format!("The status of deployment '{name}' in namespace '{ns}' is '{status}'.")
            }
            Some((Found::Service(svc), ns)) => {
                let type_ = svc
                    .spec
                    .as_ref()
                    .and_then(|s| s.type_.clone())
                    .unwrap_or_else(|| "Unknown".into());
                format!("The status of service '{name}' in namespace '{ns}' is '{type_}'.")
            }
            None => not_found_sentence(kind, name),
        };
        Ok(answer)
    }

    /// Comma-joined names, simplified for workload kinds.
    async fn list_resources(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let ns = intent.namespace.as_deref();
        let names: Vec<String> = match intent.resource_type.as_str() {
            "pod" => self
                .cluster
                .list_pods(ns)
                .await?
                .into_iter()
                .filter_map(|p| p.metadata.name)
                .map(|n| simplify_name(&n))
                .collect(),
            "deployment" => self
                .cluster
                .list_deployments(ns)
                .await?
                .into_iter()
                .filter_map(|d| d.metadata.name)
                .map(|n| simplify_name(&n))
                .collect(),
            "service" => self
                .cluster
                .list_services(ns)
                .await?
                .into_iter()
                .filter_map(|s| s.metadata.name)
                .map(|n| simplify_name(&n))
                .collect(),
            // Namespace names are not generated, so no simplification.
            "namespace" => self
                .cluster
                .list_namespaces()
                .await?
                .into_iter()
                .filter_map(|n| n.metadata.name)
                .collect(),
            other => {
                return Ok(format!(
                    "Resource type '{other}' is not supported for listing."
                ));
            }
        };
        Ok(names.join(", "))
    }

    /// Raw log text of the named pod, verbatim.
    async fn get_logs(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let Some(name) = intent.resource_name.as_deref() else {
            return Ok("Pod name is required to get logs.".into());
        };

        let located = locate(
            self.cluster.as_ref(),
            "pod",
            name,
            intent.namespace.as_deref(),
        )
        .await?;

        match located {
            Some((Found::Pod(_), ns)) => Ok(self.cluster.pod_logs(&ns, name).await?),
            _ => Ok(not_found_sentence("pod", name)),
        }
    }

    /// Full structured dump of the located resource.
    async fn describe_resource(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let kind = intent.resource_type.as_str();
        if !matches!(kind, "pod" | "deployment" | "service") {
            return Ok(format!(
                "Description is not supported for resource type '{kind}'."
            ));
        }
        let Some(name) = intent.resource_name.as_deref() else {
            return Ok("A resource name is required to describe a resource.".into());
        };

        let located = locate(
            self.cluster.as_ref(),
            kind,
            name,
            intent.namespace.as_deref(),
        )
        .await?;

        match located {
            Some((found, _)) => found.to_yaml(),
            None => Ok(not_found_sentence(kind, name)),
        }
    }

    /// One sub-field of a located resource, from a fixed per-kind set.
    async fn get_resource_detail(&self, intent: &CanonicalIntent) -> anyhow::Result<String> {
        let (Some(name), Some(detail)) = (
            intent.resource_name.as_deref(),
            intent.detail.as_deref(),
        ) else {
            return Ok("Resource name and detail are required for getting resource details.".into());
        };

        let kind = intent.resource_type.as_str();
        let ns = intent.namespace.as_deref();

        match kind {
            "pod" => {
                let Some((Found::Pod(pod), _)) =
                    locate(self.cluster.as_ref(), "pod", name, ns).await?
                else {
                    return Ok(not_found_sentence("pod", name));
                };
                let Some(container) = pod.spec.as_ref().and_then(|s| s.containers.first()) else {
                    return Ok(format!("Pod '{name}' has no containers."));
                };
                Ok(match detail {
                    "environment_variable" if intent.variable_name.is_some() => env_var_answer(
                        container.env.as_deref(),
                        intent.variable_name.as_deref().unwrap_or_default(),
                        "pod",
                        name,
                    ),
                    "mount_path" => {
                        let paths: Vec<&str> = container
                            .volume_mounts
                            .iter()
                            .flatten()
                            .map(|vm| vm.mount_path.as_str())
                            .collect();
                        format!("Mount paths for pod '{name}': {}", paths.join(", "))
                    }
                    "readiness_probe_path" => {
                        let path = container
                            .readiness_probe
                            .as_ref()
                            .and_then(|p| p.http_get.as_ref())
                            .and_then(|h| h.path.as_deref());
                        match path {
                            Some(path) => {
                                format!("The readiness probe path for pod '{name}' is '{path}'.")
                            }
                            None => format!("No readiness probe path found for pod '{name}'."),
                        }
                    }
                    "container_port" => {
                        let ports: Vec<String> = container
                            .ports
                            .iter()
                            .flatten()
                            .map(|p| p.container_port.to_string())
                            .collect();
                        format!("Container ports for pod '{name}': {}", ports.join(", "))
                    }
                    _ => unsupported_detail_sentence(detail, kind),
                })
            }
            "deployment" => {
                let Some((Found::Deployment(dep), _)) =
                    locate(self.cluster.as_ref(), "deployment", name, ns).await?
                else {
                    return Ok(not_found_sentence("deployment", name));
                };
                let container = dep
                    .spec
                    .as_ref()
                    .and_then(|s| s.template.spec.as_ref())
                    .and_then(|ps| ps.containers.first());
                let Some(container) = container else {
                    return Ok(format!("Deployment '{name}' has no containers."));
                };
                Ok(match detail {
                    "environment_variable" if intent.variable_name.is_some() => env_var_answer(
                        container.env.as_deref(),
                        intent.variable_name.as_deref().unwrap_or_default(),
                        "deployment",
                        name,
                    ),
                    "mount_path" => {
                        let paths: Vec<&str> = container
                            .volume_mounts
                            .iter()
                            .flatten()
                            .map(|vm| vm.mount_path.as_str())
                            .collect();
                        format!("Mount paths for deployment '{name}': {}", paths.join(", "))
                    }
                    _ => unsupported_detail_sentence(detail, kind),
                })
            }
            "service" => {
                let Some((Found::Service(svc), found_ns)) =
                    locate(self.cluster.as_ref(), "service", name, ns).await?
                else {
                    return Ok(not_found_sentence("service", name));
                };
                Ok(match detail {
                    "port" => {
                        let ports: Vec<String> = svc
                            .spec
                            .as_ref()
                            .and_then(|s| s.ports.as_ref())
                            .into_iter()
                            .flatten()
                            .map(|p| p.port.to_string())
                            .collect();
                        format!("Ports for service '{name}': {}", ports.join(", "))
                    }
                    "namespace" => {
                        format!("The service '{name}' is deployed in the '{found_ns}' namespace.")
                    }
                    _ => unsupported_detail_sentence(detail, kind),
                })
            }
            "persistentvolume" => {
                use crate::cluster::ClusterError;
                match self.cluster.get_persistent_volume(name).await {
                    // PersistentVolumes have no mount paths of their own;
                    // answer with the spec so the caller sees what backs it.
                    Ok(pv) if detail == "mount_path" => {
                        let spec = serde_yaml::to_string(&pv.spec)?;
                        Ok(format!("PersistentVolume '{name}' details: {spec}"))
                    }
                    Ok(_) => Ok(unsupported_detail_sentence(detail, kind)),
                    Err(ClusterError::NotFound) => {
                        Ok(format!("PersistentVolume '{name}' not found."))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            other => Ok(format!(
                "Resource type '{other}' is not supported for getting resource details."
            )),
        }
    }
}

fn not_found_sentence(kind: &str, name: &str) -> String {
    format!("{} '{name}' not found in any namespace.", capitalize(kind))
}

fn unsupported_detail_sentence(detail: &str, kind: &str) -> String {
    format!("Detail '{detail}' is not supported for resource type '{kind}'.")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn env_var_answer(env: Option<&[EnvVar]>, variable: &str, kind: &str, name: &str) -> String {
    for var in env.into_iter().flatten() {
        if var.name == variable {
            let value = var.value.as_deref().unwrap_or_default();
            return format!("The value of the environment variable '{variable}' is '{value}'.");
        }
    }
    format!("Environment variable '{variable}' not found in {kind} '{name}'.")
}
