//! Constrained query grammar for the fallback path.
//!
//! When no canonical action matches, the model is asked to propose one
//! read-only query as a JSON object in this grammar. The grammar is the
//! entire surface the model can drive: it is validated and interpreted
//! against the cluster-client allow-list, never evaluated as code.

use serde::Deserialize;

/// One read-only query proposed by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct AdHocQuery {
    pub op: AdHocOp,
    /// Resource kind the query targets (canonicalized by the executor).
    pub resource: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The four operations the fallback executor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdHocOp {
    List,
    Count,
    Get,
    Logs,
}
