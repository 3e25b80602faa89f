//! Configuration management module
//!
//! Loads process-wide settings once at startup from environment variables and `.env`

pub mod settings;

pub use settings::{
    LoggingConfig, RequestConfig, SecurityConfig, ServerConfig, Settings, UpstreamConfig,
    DEFAULT_API_URL,
};
