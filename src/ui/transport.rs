//! Relay transport
//!
//! How a session delivers its transcript to the relay

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::ui::error::UiError;

/// Sends one turn to the relay and returns its reply
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, UiError>;
}

/// Transport posting to a relay's `/api/chat` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    endpoint: String,
}

impl HttpRelayTransport {
    /// `base_url` is the relay root, e.g. `http://localhost:5000`
    pub fn new(base_url: &str) -> Result<Self, UiError> {
        let client = Client::builder()
            .user_agent(concat!("chat-relay-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, UiError> {
        debug!(
            "Posting {} messages to {}",
            request.messages.len(),
            self.endpoint
        );

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice::<ChatResponse>(&body).map_err(|e| {
                debug!("Relay reply could not be decoded: {}", e);
                UiError::MalformedReply
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|error| error.error)
            .unwrap_or(body);

        Err(UiError::Relay {
            status: status.as_u16(),
            message,
        })
    }
}
