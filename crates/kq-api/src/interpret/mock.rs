//! Scripted interpreter for testing.
//!
//! Scripts are expressed as the same JSON the wire contract uses, so tests
//! read like recorded model replies.

use async_trait::async_trait;

use super::QueryInterpreter;
use kq_intent::{AdHocQuery, RawIntent};

/// Mock interpreter returning fixed replies (or failures).
#[derive(Default)]
pub struct MockInterpreter {
    intent_json: Option<String>,
    fallback_json: Option<String>,
}

impl MockInterpreter {
    /// Script the `interpret` reply.
    pub fn with_intent(json: &str) -> Self {
        Self {
            intent_json: Some(json.to_string()),
            fallback_json: None,
        }
    }

    /// Script the `plan_fallback` reply on top of an existing script.
    pub fn and_fallback(mut self, json: &str) -> Self {
        self.fallback_json = Some(json.to_string());
        self
    }

    /// Both methods fail, as if the model were unreachable.
    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryInterpreter for MockInterpreter {
    async fn interpret(&self, _query: &str) -> anyhow::Result<RawIntent> {
        match &self.intent_json {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => anyhow::bail!("no scripted intent"),
        }
    }

    async fn plan_fallback(&self, _query: &str) -> anyhow::Result<AdHocQuery> {
        match &self.fallback_json {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => anyhow::bail!("no scripted fallback plan"),
        }
    }
}
