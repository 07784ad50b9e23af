//! Canonical actions and the action synonym table.

/// What the user wants done against the cluster.
///
/// The interpreter model is instructed to emit one of the six canonical
/// action names, but frequently replies with compound forms ("count_pods",
/// "get_pod_logs"). Those collapse onto the canonical set here; anything
/// unrecognized passes through as `Other` and is routed to the fallback
/// synthesizer by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    CountResources,
    GetStatus,
    ListResources,
    GetLogs,
    DescribeResource,
    GetResourceDetail,
    /// The interpreter explicitly declined to classify the query.
    Unknown,
    /// Unrecognized action string, carried through unchanged.
    Other(String),
}

impl ActionKind {
    /// Map a raw action string onto the canonical set.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "count_resources" | "count_pods" | "count_deployments" | "count_nodes"
            | "count_services" => ActionKind::CountResources,
            "get_status" | "get_pod_status" | "get_deployment_status" | "get_service_status" => {
                ActionKind::GetStatus
            }
            "list_resources" | "list_pods" | "list_deployments" | "list_services" => {
                ActionKind::ListResources
            }
            "get_logs" | "get_pod_logs" => ActionKind::GetLogs,
            "describe_resource" | "describe_pod" | "describe_deployment" | "get_pod_details" => {
                ActionKind::DescribeResource
            }
            "get_resource_detail" => ActionKind::GetResourceDetail,
            "unknown" => ActionKind::Unknown,
            other => ActionKind::Other(other.to_string()),
        }
    }
}
