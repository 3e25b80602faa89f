//! Chat Relay Library
//!
//! A single-route HTTP relay that forwards chat transcripts to the OpenAI
//! completions API, and a session client that tracks transcript and cost

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, create_router_with_provider, AppState};
pub use models::{ChatRequest, ChatResponse, Message, Usage};
pub use services::{CompletionProvider, UpstreamClient};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
