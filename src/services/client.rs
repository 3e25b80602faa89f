//! HTTP client service
//!
//! Encapsulates HTTP communication with the upstream completions API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::models::{ChatResponse, Message, UpstreamRequest};

/// Header telling the provider not to use request data for training
pub const DATA_USAGE_HEADER: &str = "X-OpenAI-Data-Usage";

/// Upstream completion provider
///
/// One request, one response. Implementations must not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Send a chat completion request for the full transcript
    async fn chat_complete(&self, model: &str, messages: &[Message]) -> Result<ChatResponse>;
}

/// Provider error body (`{"error": {"message": ...}}`)
#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// OpenAI chat completions client
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a new client instance
    ///
    /// No timeout is set; the transport default applies.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("chat-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Handle HTTP response
    async fn handle_response(&self, response: Response) -> Result<ChatResponse> {
        let status = response.status();

        if status.is_success() {
            let chat_response: ChatResponse = response
                .json()
                .await
                .context("Failed to parse upstream response")?;

            debug!(
                "Upstream request completed with {} choices",
                chat_response.choices.len()
            );
            Ok(chat_response)
        } else {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<ProviderErrorResponse>(&error_text) {
                warn!("Upstream API error: {} - {}", status, error_response.error.message);
                anyhow::bail!("Upstream API error: {} - {}", status, error_response.error.message);
            } else {
                warn!("Upstream API request failed: {} - {}", status, error_text);
                anyhow::bail!("Upstream API request failed: {} - {}", status, error_text);
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for UpstreamClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat_complete(&self, model: &str, messages: &[Message]) -> Result<ChatResponse> {
        debug!("Sending chat completion request for model: {}", model);

        let request = UpstreamRequest { model, messages };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header(DATA_USAGE_HEADER, "off")
            .json(&request)
            .send()
            .await
            .context("Failed to send request")?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> UpstreamConfig {
        UpstreamConfig {
            api_key: "test_key".to_string(),
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            default_model: "gpt-4o-2024-08-06".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = UpstreamClient::new(test_config());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().name(), "openai");
    }

    #[test]
    fn test_client_debug_hides_key() {
        let client = UpstreamClient::new(test_config()).unwrap();
        assert!(!format!("{:?}", client).contains("test_key"));
    }

    #[test]
    fn test_upstream_request_shape() {
        let messages = vec![Message::user("Hello")];
        let request = UpstreamRequest {
            model: "gpt-4o-mini",
            messages: &messages,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }
}
