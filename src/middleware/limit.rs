//! Body limit middleware
//!
//! Gives oversized requests the same `{ "error": ... }` body as every other rejection

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::utils::error::AppError;

/// Rewrite 413 replies into the relay's JSON error body
///
/// The body limit layer answers with plain text when `Content-Length` is too
/// large, and the body extractor does the same when a streamed body overruns.
/// Both surface here as a 413. `max_request_size` is the configured limit.
pub async fn payload_limit_middleware(
    State(max_request_size): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(max_request_size).into_response();
    }

    response
}
