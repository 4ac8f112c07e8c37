//! LLM request/response types for taskscribe.
//!
//! These types model the provider-agnostic data shapes for a single
//! non-streaming completion: the request (with optional structured-output
//! constraint), the response, usage tracking, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

impl MessageRole {
    /// Wire name used by the Messages API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// A single-shot completion call, independent of any vendor wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Constrains the reply to a JSON schema when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_config: Option<OutputConfig>,
}

/// Structured output configuration sent alongside a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Output format wrapper; `type_field` is always `"json_schema"` today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFormat {
    #[serde(rename = "type")]
    pub type_field: String,
    pub json_schema: OutputJsonSchema,
}

/// A named JSON schema the provider must conform its reply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputJsonSchema {
    pub name: String,
    pub schema: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl OutputConfig {
    /// Build a strict `json_schema` output config.
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            format: OutputFormat {
                type_field: "json_schema".to_string(),
                json_schema: OutputJsonSchema {
                    name: name.into(),
                    schema,
                    strict: Some(true),
                },
            },
        }
    }
}

/// Recursively set `additionalProperties: false` on every object schema.
///
/// Strict structured output rejects schemas that leave object properties open.
pub fn add_additional_properties_false(schema: &mut serde_json::Value) {
    match schema {
        serde_json::Value::Object(map) => {
            if map.get("type").and_then(|t| t.as_str()) == Some("object") {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );
            }
            for value in map.values_mut() {
                add_additional_properties_false(value);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                add_additional_properties_false(item);
            }
        }
        _ => {}
    }
}

/// The provider's reply with text blocks already joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Why generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    Refusal,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndTurn => "end_turn",
            Self::MaxTokens => "max_tokens",
            Self::StopSequence => "stop_sequence",
            Self::Refusal => "refusal",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billed tokens for one call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Failures talking to the model provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(StopReason::MaxTokens.to_string(), "max_tokens");
        let json = serde_json::to_value(StopReason::StopSequence).unwrap();
        assert_eq!(json, "stop_sequence");
    }

    #[test]
    fn test_completion_request_skips_empty_options() {
        let request = CompletionRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "hi".to_string(),
            }],
            system: None,
            max_tokens: 16,
            temperature: None,
            output_config: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert!(json.get("output_config").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_output_config_json_schema_shape() {
        let config = OutputConfig::json_schema("task_list_output", serde_json::json!({"type": "object"}));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["format"]["type"], "json_schema");
        assert_eq!(json["format"]["json_schema"]["name"], "task_list_output");
        assert_eq!(json["format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_add_additional_properties_false_recurses() {
        let mut schema = serde_json::json!({
            "type": "object",
            "properties": {
                "inner": {"type": "object", "properties": {}},
                "name": {"type": "string"}
            },
            "$defs": {"Other": {"type": "object"}}
        });
        add_additional_properties_false(&mut schema);
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["inner"]["additionalProperties"], false);
        assert_eq!(schema["$defs"]["Other"]["additionalProperties"], false);
        assert!(schema["properties"]["name"].get("additionalProperties").is_none());
    }

    #[test]
    fn test_rate_limit_message_carries_delay() {
        let err = LlmError::RateLimited {
            retry_after_ms: Some(3000),
        };
        assert_eq!(err.to_string(), "rate limited (retry after Some(3000)ms)");
    }
}
