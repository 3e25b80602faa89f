//! Data models module
//!
//! Defines request and response data structures for the relay endpoint and the upstream API

pub mod chat;

pub use chat::{ChatRequest, ChatResponse, ErrorResponse, Message, UpstreamRequest, Usage};
