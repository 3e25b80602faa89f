//! Logging utilities
//!
//! Subscriber setup and request summaries for debug logs

use anyhow::{Context, Result};
use tracing::info;

use crate::config::LoggingConfig;
use crate::models::{ChatRequest, Message};

/// Set to true to include full message content in debug logs
pub const VERBOSE_REQUEST_LOGGING: bool = false;

/// Initialize the global tracing subscriber
///
/// Uses the level and format already validated by `Settings`; `json` switches to JSON lines.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let log_level = config.level.as_str();

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Logging system initialized ({}, {})", config.level, config.format);
    Ok(())
}

/// Truncate a string with a note about original length
fn truncate_content(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let dropped = s[cut..].chars().count();
            format!("{}... ({} chars truncated)", &s[..cut], dropped)
        }
        None => s.to_string(),
    }
}

fn filter_message(msg: &Message) -> serde_json::Value {
    let max_len = if msg.role == "system" { 100 } else { 200 };
    serde_json::json!({
        "role": msg.role,
        "content": truncate_content(&msg.content, max_len),
    })
}

/// Create a filtered summary of a relay request for logging
pub fn create_chat_request_log_summary(request: &ChatRequest, model: &str) -> serde_json::Value {
    if VERBOSE_REQUEST_LOGGING {
        serde_json::json!({
            "model": model,
            "messages": request.messages,
        })
    } else {
        let recent: Vec<serde_json::Value> = request
            .messages
            .iter()
            .rev()
            .take(3)
            .rev()
            .map(filter_message)
            .collect();

        serde_json::json!({
            "model": model,
            "message_count": request.messages.len(),
            "recent_messages": recent,
        })
    }
}
