//! Chat relay data models
//!
//! Wire structures shared by the relay endpoint, the upstream call and the session client

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";

/// Role of a user-authored message
pub const ROLE_USER: &str = "user";

/// Role of a model-authored message
pub const ROLE_ASSISTANT: &str = "assistant";

/// Role of a system prompt
pub const ROLE_SYSTEM: &str = "system";

/// One entry of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role (user/assistant/system)
    pub role: String,
    /// Message text, markdown for display
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }
}

/// Validated relay request
///
/// Built by `services::validator` from the raw body, or by a session before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full transcript, oldest first
    pub messages: Vec<Message>,
    /// Requested model (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Body sent to the upstream completions endpoint
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

/// Relay reply, also the accepted shape of an upstream reply
///
/// `choices` and `usage` are kept as raw JSON so they pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions
    pub choices: Vec<Value>,
    /// Token usage counters
    ///
    /// `None` only when the field was missing; an explicit `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage: Option<Value>,
}

// Only called when the field is present, so `null` becomes `Some(Value::Null)`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ChatResponse {
    /// Content of the first choice's message, if it is a string
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.get("message")?.get("content")?.as_str()
    }

    /// Typed usage counters; missing or malformed usage counts as zero
    pub fn usage_stats(&self) -> Usage {
        self.usage
            .as_ref()
            .and_then(|usage| serde_json::from_value(usage.clone()).ok())
            .unwrap_or_default()
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input token count
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Output token count
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Error body returned by the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi there"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        }))
        .unwrap();

        assert_eq!(response.first_content(), Some("Hi there"));
        assert_eq!(
            response.usage_stats(),
            Usage {
                prompt_tokens: 3,
                completion_tokens: 2
            }
        );
    }

    #[test]
    fn test_missing_usage_is_zero() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();

        assert_eq!(response.first_content(), None);
        assert_eq!(response.usage_stats(), Usage::default());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"choices": []}));
    }

    #[test]
    fn test_null_usage_round_trips() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [], "usage": null})).unwrap();

        assert_eq!(response.usage, Some(Value::Null));
        assert_eq!(response.usage_stats(), Usage::default());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"choices": [], "usage": null})
        );
    }

    #[test]
    fn test_request_omits_absent_model() {
        let request = ChatRequest {
            messages: vec![Message::user("Hello")],
            model: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"messages": [{"role": "user", "content": "Hello"}]})
        );
    }
}
