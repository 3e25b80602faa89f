//! Chat session
//!
//! In-memory transcript, single-flight turn state and running cost

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{ChatRequest, ChatResponse, Message, Usage};
use crate::ui::error::UiError;
use crate::ui::pricing::PriceTable;
use crate::ui::render::{render_message, RenderedMessage};
use crate::ui::transport::RelayTransport;

/// Where a session is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Empty input, or a turn was already in flight
    Ignored,
    /// An assistant message was appended
    Replied,
    /// The turn failed; `last_error` holds the message shown to the user
    Failed,
}

/// One conversation
///
/// The transcript only grows. A failed turn keeps its user message and gets no reply.
#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<Message>,
    model: String,
    in_flight_model: Option<String>,
    prices: Arc<PriceTable>,
    state: SessionState,
    current_cost: f64,
    total_cost: f64,
    last_usage: Option<Usage>,
    last_error: Option<String>,
}

impl ChatSession {
    pub fn new(prices: Arc<PriceTable>, model: impl Into<String>) -> Self {
        Self {
            transcript: Vec::new(),
            model: model.into(),
            in_flight_model: None,
            prices,
            state: SessionState::Idle,
            current_cost: 0.0,
            total_cost: 0.0,
            last_usage: None,
            last_error: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == SessionState::Sending
    }

    /// Cost of the most recent successful turn
    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    /// Sum of every successful turn's cost
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn last_usage(&self) -> Option<Usage> {
        self.last_usage
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Change the model for the next submission
    ///
    /// Refused while a turn is in flight. Past messages are untouched.
    pub fn set_model(&mut self, model: impl Into<String>) -> Result<(), UiError> {
        if self.is_sending() {
            return Err(UiError::Busy);
        }
        self.model = model.into();
        Ok(())
    }

    /// Start a turn
    ///
    /// Returns the request to send, or `None` when the text is blank or a
    /// turn is already in flight.
    pub fn begin_turn(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() || self.is_sending() {
            return None;
        }

        self.transcript.push(Message::user(text));
        self.last_error = None;
        self.state = SessionState::Sending;
        self.in_flight_model = Some(self.model.clone());

        Some(ChatRequest {
            messages: self.transcript.clone(),
            model: Some(self.model.clone()),
        })
    }

    /// Finish the in-flight turn with the relay's reply
    pub fn complete_turn(&mut self, result: Result<ChatResponse, UiError>) -> TurnOutcome {
        if !self.is_sending() {
            warn!("complete_turn called with no turn in flight");
            return TurnOutcome::Ignored;
        }

        let model = self
            .in_flight_model
            .take()
            .unwrap_or_else(|| self.model.clone());
        self.state = SessionState::Idle;

        let reply = result.and_then(|response| {
            let content = response
                .first_content()
                .ok_or(UiError::MalformedReply)?
                .to_string();
            Ok((content, response.usage_stats()))
        });

        match reply {
            Ok((content, usage)) => {
                let cost = self.prices.cost(&model, &usage);
                debug!(
                    "Turn completed on {}: {} prompt / {} completion tokens",
                    model, usage.prompt_tokens, usage.completion_tokens
                );

                self.transcript.push(Message::assistant(content));
                self.current_cost = cost;
                self.total_cost += cost;
                self.last_usage = Some(usage);
                TurnOutcome::Replied
            }
            Err(e) => {
                warn!("Turn failed: {}", e);
                self.last_error = Some(e.to_string());
                TurnOutcome::Failed
            }
        }
    }

    /// Send `text` through `transport` and record the outcome
    pub async fn submit<T>(&mut self, text: &str, transport: &T) -> TurnOutcome
    where
        T: RelayTransport + ?Sized,
    {
        let Some(request) = self.begin_turn(text) else {
            return TurnOutcome::Ignored;
        };

        let result = transport.send(&request).await;
        self.complete_turn(result)
    }

    /// Transcript ready for display
    pub fn rendered_transcript(&self) -> Vec<RenderedMessage> {
        self.transcript.iter().map(render_message).collect()
    }
}
