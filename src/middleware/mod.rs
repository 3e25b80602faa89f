//! Middleware module
//!
//! Request logging and body limit handling applied to every route

pub mod limit;
pub mod logging;

pub use limit::payload_limit_middleware;
pub use logging::request_logging_middleware;
