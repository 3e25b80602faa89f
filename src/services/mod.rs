//! Service layer module
//!
//! Contains request validation and the upstream HTTP client

pub mod client;
pub mod validator;

pub use client::{CompletionProvider, UpstreamClient, DATA_USAGE_HEADER};
pub use validator::{parse_chat_request, validate_chat_request, validate_messages};
