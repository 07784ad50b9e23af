//! AWS Bedrock interpreter — Converse API with fixed system prompts.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};
use tokio::time::timeout;

use super::QueryInterpreter;
use kq_intent::{AdHocQuery, RawIntent};

/// System prompt for query interpretation: the six canonical actions and the
/// expected JSON shape.
const INTERPRET_PROMPT: &str = r#"You are a Kubernetes assistant. Interpret the user's query and output a JSON object with two keys: 'action' and 'parameters'. The 'action' must be one of ['count_resources', 'get_status', 'list_resources', 'get_logs', 'describe_resource', 'get_resource_detail']. If the user's intent does not match any of these actions, set 'action' to 'unknown'. The 'parameters' should include 'resource_type' (e.g., 'pod', 'deployment', 'service', 'node'), 'resource_name' if applicable, 'namespace' if specified, and any specific 'detail' the user is requesting (e.g., 'environment_variable', 'mount_path', 'container_port'). Use 'variable_name' for the name of a requested environment variable. Ensure 'resource_name' is the exact name used in Kubernetes, replacing spaces with hyphens if necessary, and exclude resource type abbreviations like 'svc', 'pod', etc. Do not include any additional text outside of the JSON object."#;

/// System prompt for the fallback path: one read-only query in the
/// constrained grammar, never code.
const FALLBACK_PROMPT: &str = r#"You are a Kubernetes assistant. The user's request did not match any known action. Propose exactly one read-only query that best answers it, as a JSON object with keys: 'op' (one of 'list', 'count', 'get', 'logs'), 'resource' (a lowercase singular Kubernetes kind such as 'pod', 'deployment', 'service', 'node', 'namespace'), and optionally 'namespace' and 'name'. 'get' and 'logs' require 'name'; 'logs' only applies to pods. Do not include any additional text outside of the JSON object."#;

/// Configuration for the Bedrock interpreter.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// Bedrock model ID (e.g., "us.amazon.nova-lite-v1:0").
    pub model_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BedrockConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let model_id =
            std::env::var("BEDROCK_MODEL_ID").unwrap_or_else(|_| "us.amazon.nova-lite-v1:0".into());
        let timeout_secs: u64 = std::env::var("BEDROCK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);
        Self {
            model_id,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Bedrock Converse API interpreter.
pub struct BedrockInterpreter {
    client: BedrockClient,
    config: BedrockConfig,
}

impl BedrockInterpreter {
    /// Create a new interpreter with a pre-built Bedrock client.
    pub fn new(client: BedrockClient, config: BedrockConfig) -> Self {
        Self { client, config }
    }

    /// Call the Converse API and return the text content of the reply.
    async fn converse(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let user_message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user.to_string()))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build message: {e}"))?;

        let call = self
            .client
            .converse()
            .model_id(&self.config.model_id)
            .system(SystemContentBlock::Text(system.to_string()))
            .messages(user_message)
            .send();

        let response = match timeout(self.config.timeout, call).await {
            Ok(result) => result.map_err(|e| anyhow::anyhow!("bedrock converse error: {e}"))?,
            Err(_) => anyhow::bail!(
                "bedrock call timed out after {}s",
                self.config.timeout.as_secs()
            ),
        };

        let output = response
            .output()
            .ok_or_else(|| anyhow::anyhow!("no output in bedrock response"))?;

        let text = match output {
            aws_sdk_bedrockruntime::types::ConverseOutput::Message(msg) => {
                msg.content().iter().find_map(|block| {
                    if let ContentBlock::Text(t) = block {
                        Some(t.clone())
                    } else {
                        None
                    }
                })
            }
            _ => None,
        };

        text.ok_or_else(|| anyhow::anyhow!("no text content in bedrock response"))
    }
}

#[async_trait]
impl QueryInterpreter for BedrockInterpreter {
    async fn interpret(&self, query: &str) -> anyhow::Result<RawIntent> {
        let user_prompt = format!("User query: {query}\nResponse:");
        let reply = self.converse(INTERPRET_PROMPT, &user_prompt).await?;
        tracing::debug!(reply = %reply, "interpreter reply");
        parse_intent_reply(&reply)
    }

    async fn plan_fallback(&self, query: &str) -> anyhow::Result<AdHocQuery> {
        let user_prompt = format!("User query: {query}\nResponse:");
        let reply = self.converse(FALLBACK_PROMPT, &user_prompt).await?;
        tracing::debug!(reply = %reply, "fallback plan reply");
        let plan: AdHocQuery = serde_json::from_str(extract_json(&reply))
            .map_err(|e| anyhow::anyhow!("failed to parse fallback plan: {e} — raw: {reply}"))?;
        Ok(plan)
    }
}

/// Parse the interpreter reply, requiring both top-level keys before
/// deserializing: a reply missing either is an interpretation failure, not a
/// fallback candidate.
fn parse_intent_reply(reply: &str) -> anyhow::Result<RawIntent> {
    let value: serde_json::Value = serde_json::from_str(extract_json(reply))
        .map_err(|e| anyhow::anyhow!("failed to parse interpreter reply as JSON: {e}"))?;

    if value.get("action").is_none() || value.get("parameters").is_none() {
        anyhow::bail!("interpreter reply missing 'action' or 'parameters' keys");
    }

    serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("interpreter reply has invalid shape: {e}"))
}

/// Extract JSON from model output that may be wrapped in markdown code blocks.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Try ```json ... ``` first
    if let Some(start) = trimmed.find("```json") {
        let after_fence = &trimmed[start + 7..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    // Try ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            return after_fence[..end].trim();
        }
    }

    // Assume raw JSON
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── extract_json ─────────────────────────────────────────────

    #[test]
    fn extract_json_raw() {
        let input = r#"{"action": "count_resources", "parameters": {}}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn extract_json_markdown_json_block() {
        let input = "```json\n{\"action\": \"get_logs\"}\n```";
        assert_eq!(extract_json(input), "{\"action\": \"get_logs\"}");
    }

    #[test]
    fn extract_json_markdown_plain_block() {
        let input = "```\n{\"action\": \"get_logs\"}\n```";
        assert_eq!(extract_json(input), "{\"action\": \"get_logs\"}");
    }

    #[test]
    fn extract_json_with_surrounding_text() {
        let input = "Here you go:\n```json\n{\"op\": \"list\"}\n```\nDone.";
        assert_eq!(extract_json(input), "{\"op\": \"list\"}");
    }

    // ── parse_intent_reply ───────────────────────────────────────

    #[test]
    fn valid_reply_parses() {
        let reply = r#"{"action": "count_pods", "parameters": {"resource_type": "pods"}}"#;
        let intent = parse_intent_reply(reply).unwrap();
        assert_eq!(intent.action, "count_pods");
        assert_eq!(intent.parameters.resource_type.as_deref(), Some("pods"));
    }

    #[test]
    fn fenced_reply_parses() {
        let reply = "```json\n{\"action\": \"unknown\", \"parameters\": {}}\n```";
        let intent = parse_intent_reply(reply).unwrap();
        assert_eq!(intent.action, "unknown");
    }

    #[test]
    fn missing_parameters_key_is_hard_failure() {
        assert!(parse_intent_reply(r#"{"action": "get_status"}"#).is_err());
    }

    #[test]
    fn missing_action_key_is_hard_failure() {
        assert!(parse_intent_reply(r#"{"parameters": {}}"#).is_err());
    }

    #[test]
    fn non_json_reply_is_hard_failure() {
        assert!(parse_intent_reply("I cannot help with that.").is_err());
    }
}
