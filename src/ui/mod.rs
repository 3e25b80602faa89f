//! Chat session client
//!
//! Holds a conversation in memory, sends it to the relay one turn at a time,
//! renders messages and estimates cost from returned token counts

pub mod error;
pub mod pricing;
pub mod render;
pub mod session;
pub mod transport;

pub use error::UiError;
pub use pricing::{format_cost, ModelOption, ModelRate, PriceTable, MODEL_CATALOG};
pub use render::{format_text, render_message, role_label, RenderedMessage};
pub use session::{ChatSession, SessionState, TurnOutcome};
pub use transport::{HttpRelayTransport, RelayTransport};
