//! Error handling module
//!
//! Defines error types and handling logic used by the relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt::Display;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Client-facing message for rejected transcripts
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";

/// Client-facing message for upstream failures
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch response from OpenAI API";

/// Client-facing message for bodies over the configured limit
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed transcript or request body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request body exceeds `MAX_REQUEST_SIZE`
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// Upstream unreachable, non-2xx, or malformed reply
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Generic message safe to show the caller
    ///
    /// Never includes the detail carried by the variant.
    pub fn client_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => INVALID_INPUT_MESSAGE,
            AppError::PayloadTooLarge(_) => PAYLOAD_TOO_LARGE_MESSAGE,
            AppError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }

    /// Convert to the relay's error body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.client_message().to_string(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Detail stays in the server log
        if status.is_server_error() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add invalid input error context
    fn invalid_input_context(self, message: &str) -> AppResult<T>;

    /// Add upstream error context
    fn upstream_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Display,
{
    fn invalid_input_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InvalidInput(format!("{}: {:#}", message, e)))
    }

    fn upstream_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Upstream(format!("{}: {:#}", message, e)))
    }
}
