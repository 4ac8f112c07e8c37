//! Wire shapes for `POST /v1/messages`.
//!
//! Kept separate from `taskscribe_types::llm`; the client converts between
//! the two.

use serde::{Deserialize, Serialize};

use taskscribe_types::llm::OutputConfig;

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Serialized as-is; the API enforces the schema on the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_config: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Reply content. Only text is read; other block kinds deserialize to
/// `Other` and are dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// Successful reply body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    pub id: String,
    pub content: Vec<AnthropicContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: AnthropicUsage,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorResponse {
    pub error: AnthropicError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_unset_optionals() {
        let req = AnthropicRequest {
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 512,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: "Summarize this call".to_string(),
            }],
            system: None,
            temperature: None,
            output_config: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "claude-3-5-haiku-latest");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
        assert!(json.get("output_config").is_none());
    }

    #[test]
    fn test_request_with_output_config() {
        let req = AnthropicRequest {
            model: "m".to_string(),
            max_tokens: 4096,
            messages: vec![],
            system: Some("Be terse.".to_string()),
            temperature: None,
            output_config: Some(OutputConfig::json_schema(
                "task_list_output",
                serde_json::json!({"type": "object"}),
            )),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["system"], "Be terse.");
        assert_eq!(json["output_config"]["format"]["type"], "json_schema");
        assert_eq!(
            json["output_config"]["format"]["json_schema"]["name"],
            "task_list_output"
        );
        assert_eq!(json["output_config"]["format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_response_ignores_non_text_blocks() {
        let json = r#"{
            "id": "msg_01XFDUD",
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "s"},
                {"type": "text", "text": "Hello!"}
            ],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 812, "output_tokens": 97}
        }"#;
        let resp: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "msg_01XFDUD");
        assert_eq!(resp.content.len(), 2);
        assert!(matches!(resp.content[0], AnthropicContentBlock::Other));
        assert!(matches!(&resp.content[1], AnthropicContentBlock::Text { text } if text == "Hello!"));
        assert_eq!(resp.usage.output_tokens, 97);
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"type": "error", "error": {"type": "overloaded_error", "message": "Server busy"}}"#;
        let err: AnthropicErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error.error_type, "overloaded_error");
        assert_eq!(err.error.message, "Server busy");
    }
}
