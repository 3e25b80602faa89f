//! Request validation
//!
//! Turns a raw JSON body into a typed `ChatRequest` before any relay logic runs

use serde_json::{Map, Value};

use crate::models::{ChatRequest, Message};
use crate::utils::error::{AppError, AppResult, ErrorContext};

/// Parse and validate a raw request body
pub fn parse_chat_request(body: &[u8]) -> AppResult<ChatRequest> {
    let value: Value =
        serde_json::from_slice(body).invalid_input_context("Request body is not valid JSON")?;
    validate_chat_request(&value)
}

/// Validate a decoded request body
///
/// `messages` must be a non-empty array of objects with non-empty string `role`
/// and `content`. `model` may be absent, null, or a string; an empty string
/// counts as absent.
pub fn validate_chat_request(body: &Value) -> AppResult<ChatRequest> {
    let object = body
        .as_object()
        .ok_or_else(|| AppError::InvalidInput("Request body must be a JSON object".to_string()))?;

    let messages = validate_messages(object.get("messages").unwrap_or(&Value::Null))?;
    let model = validate_model(object)?;

    Ok(ChatRequest { messages, model })
}

/// Validate a transcript value
pub fn validate_messages(messages: &Value) -> AppResult<Vec<Message>> {
    let items = messages
        .as_array()
        .ok_or_else(|| AppError::InvalidInput("messages must be an array".to_string()))?;

    if items.is_empty() {
        return Err(AppError::InvalidInput("messages must not be empty".to_string()));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_message(index, item))
        .collect()
}

fn validate_message(index: usize, item: &Value) -> AppResult<Message> {
    let role = non_empty_string(item, "role")
        .ok_or_else(|| AppError::InvalidInput(format!("messages[{}].role must be a non-empty string", index)))?;
    let content = non_empty_string(item, "content")
        .ok_or_else(|| AppError::InvalidInput(format!("messages[{}].content must be a non-empty string", index)))?;

    Ok(Message::new(role, content))
}

fn non_empty_string<'a>(item: &'a Value, field: &str) -> Option<&'a str> {
    item.get(field)?.as_str().filter(|s| !s.is_empty())
}

fn validate_model(object: &Map<String, Value>) -> AppResult<Option<String>> {
    match object.get("model") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(model)) if model.is_empty() => Ok(None),
        Some(Value::String(model)) => Ok(Some(model.clone())),
        Some(_) => Err(AppError::InvalidInput("model must be a string".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_well_formed_transcript() {
        let request = validate_chat_request(&json!({
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hello"}
            ],
            "model": "gpt-4o-mini"
        }))
        .unwrap();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1], Message::user("Hello"));
        assert_eq!(request.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_rejects_missing_content() {
        let result = validate_chat_request(&json!({
            "messages": [{"role": "user"}]
        }));

        match result {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("messages[0].content")),
            other => panic!("Expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_body() {
        let result = parse_chat_request(b"{not json");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
