//! Canonical resource kinds and the resource synonym table.

use std::fmt;

/// A canonical resource kind ("pod", "deployment", "service", ...).
///
/// Deliberately a newtype over `String` rather than a closed enum: the
/// cluster's resource universe is extensible, and unrecognized kinds must
/// pass through so handlers can answer with an explanatory sentence instead
/// of failing at parse time. The synonym table only recognizes the fixed
/// subset below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKind(String);

impl ResourceKind {
    /// Map a raw resource-type string (singular, plural, or kubectl-style
    /// abbreviation) onto its canonical singular form. Unmapped input passes
    /// through lower-cased.
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let canonical = match lower.as_str() {
            "pods" | "pod" | "po" | "p" => "pod",
            "deployments" | "deployment" | "deploy" | "dep" => "deployment",
            // Common label for an in-cluster image registry deployment.
            "registry" => "deployment",
            "services" | "service" | "svc" => "service",
            "nodes" | "node" | "no" => "node",
            "configmaps" | "configmap" | "cm" => "configmap",
            "secrets" | "secret" | "sec" => "secret",
            "namespaces" | "namespace" | "ns" => "namespace",
            "endpoints" | "endpoint" | "ep" => "endpoint",
            "ingresses" | "ingress" | "ing" => "ingress",
            "persistentvolumeclaims" | "persistentvolumeclaim" | "pvc" => "persistentvolumeclaim",
            "persistentvolumes" | "persistentvolume" | "persistent volume" | "pv" => {
                "persistentvolume"
            }
            "replicasets" | "replicaset" | "rs" => "replicaset",
            "statefulsets" | "statefulset" | "sts" => "statefulset",
            "daemonsets" | "daemonset" | "ds" => "daemonset",
            "jobs" | "job" => "job",
            "cronjobs" | "cronjob" | "cj" => "cronjob",
            "roles" | "role" => "role",
            "rolebindings" | "rolebinding" | "rb" => "rolebinding",
            "clusterroles" | "clusterrole" | "cr" => "clusterrole",
            "clusterrolebindings" | "clusterrolebinding" | "crb" => "clusterrolebinding",
            _ => return ResourceKind(lower),
        };
        ResourceKind(canonical.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
