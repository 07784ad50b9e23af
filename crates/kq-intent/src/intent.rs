//! Raw and canonical intent records, and the normalizer between them.

use serde::Deserialize;

use crate::action::ActionKind;
use crate::names::normalize_resource_name;
use crate::resource::ResourceKind;

/// Intent as emitted by the interpreter model. Untrusted: any field except
/// `action` may be absent, and `action` may be anything at all.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIntent {
    pub action: String,
    #[serde(default)]
    pub parameters: RawParameters,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParameters {
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
    pub namespace: Option<String>,
    pub detail: Option<String>,
    pub variable_name: Option<String>,
    /// Alias some interpreter replies use for `variable_name`.
    pub specific_detail: Option<String>,
}

impl RawParameters {
    pub fn is_empty(&self) -> bool {
        self.resource_type.is_none()
            && self.resource_name.is_none()
            && self.namespace.is_none()
            && self.detail.is_none()
            && self.variable_name.is_none()
            && self.specific_detail.is_none()
    }
}

/// Validated intent with vocabulary normalization applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalIntent {
    pub action: ActionKind,
    pub resource_type: ResourceKind,
    /// Slug-normalized; `None` when absent or when slugging left nothing.
    pub resource_name: Option<String>,
    pub namespace: Option<String>,
    pub detail: Option<String>,
    pub variable_name: Option<String>,
}

/// Outcome of normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Intent(CanonicalIntent),
    /// Escape hatch: the interpreter could not classify the query (or gave
    /// no parameters). The caller routes the original free text to the
    /// fallback synthesizer instead of failing.
    Fallback,
}

/// Apply the vocabulary to a raw intent.
pub fn normalize(raw: RawIntent) -> Normalized {
    if raw.action == "unknown" || raw.parameters.is_empty() {
        return Normalized::Fallback;
    }

    let action = ActionKind::normalize(&raw.action);
    let p = raw.parameters;

    let resource_name = p
        .resource_name
        .as_deref()
        .map(normalize_resource_name)
        .filter(|n| !n.is_empty());

    Normalized::Intent(CanonicalIntent {
        action,
        resource_type: ResourceKind::normalize(p.resource_type.as_deref().unwrap_or("")),
        resource_name,
        namespace: p.namespace,
        detail: p.detail,
        variable_name: p.variable_name.or(p.specific_detail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawIntent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn count_pods_normalizes_to_pod_count() {
        let out = normalize(raw(
            r#"{"action": "count_pods", "parameters": {"resource_type": "pods"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.action, ActionKind::CountResources);
        assert_eq!(intent.resource_type.as_str(), "pod");
    }

    #[test]
    fn unknown_action_routes_to_fallback() {
        let out = normalize(raw(r#"{"action": "unknown", "parameters": {}}"#));
        assert_eq!(out, Normalized::Fallback);
    }

    #[test]
    fn missing_parameters_route_to_fallback() {
        let out = normalize(raw(r#"{"action": "list_resources"}"#));
        assert_eq!(out, Normalized::Fallback);
    }

    #[test]
    fn conversational_name_is_slugged() {
        let out = normalize(raw(
            r#"{"action": "get_status", "parameters": {"resource_type": "svc", "resource_name": "My Web Service"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.resource_type.as_str(), "service");
        assert_eq!(intent.resource_name.as_deref(), Some("my-web"));
    }

    #[test]
    fn empty_slug_means_no_name() {
        let out = normalize(raw(
            r#"{"action": "get_logs", "parameters": {"resource_type": "pod", "resource_name": " pod"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.resource_name, None);
    }

    #[test]
    fn unrecognized_action_passes_through() {
        let out = normalize(raw(
            r#"{"action": "scale_deployment", "parameters": {"resource_type": "deployment"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.action, ActionKind::Other("scale_deployment".into()));
    }

    #[test]
    fn specific_detail_aliases_variable_name() {
        let out = normalize(raw(
            r#"{"action": "get_resource_detail", "parameters": {"resource_type": "pod", "resource_name": "api", "detail": "environment_variable", "specific_detail": "DB_HOST"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.variable_name.as_deref(), Some("DB_HOST"));
    }

    #[test]
    fn namespace_and_detail_pass_through_unchanged() {
        let out = normalize(raw(
            r#"{"action": "list_resources", "parameters": {"resource_type": "pods", "namespace": "Kube-System", "detail": "foo"}}"#,
        ));
        let Normalized::Intent(intent) = out else {
            panic!("expected canonical intent");
        };
        assert_eq!(intent.namespace.as_deref(), Some("Kube-System"));
        assert_eq!(intent.detail.as_deref(), Some("foo"));
    }
}
