//! Model-backed interpretation of free-text queries.
//!
//! Two contracts with the model: `interpret` turns a question into a raw
//! `{action, parameters}` intent, and `plan_fallback` asks for a single
//! constrained ad hoc query when no canonical action matched.

pub mod bedrock;
pub mod mock;

use async_trait::async_trait;

use kq_intent::{AdHocQuery, RawIntent};

/// Trait for the language-model collaborator.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    /// Translate free text into a raw intent. An unparseable or incomplete
    /// reply is a hard failure, surfaced as a 500 by the route layer.
    async fn interpret(&self, query: &str) -> anyhow::Result<RawIntent>;

    /// Propose one read-only ad hoc query for text no canonical action
    /// matched. Failures here are downgraded by the fallback synthesizer.
    async fn plan_fallback(&self, query: &str) -> anyhow::Result<AdHocQuery>;
}

pub use bedrock::BedrockInterpreter;
pub use mock::MockInterpreter;
