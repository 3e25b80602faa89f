//! Chat relay handler
//!
//! Validates a transcript and forwards it to the upstream completions API

use crate::handlers::AppState;
use crate::models::ChatResponse;
use crate::services::parse_chat_request;
use crate::utils::error::{AppResult, ErrorContext};
use crate::utils::logging::create_chat_request_log_summary;
use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use tracing::debug;

/// Handle chat requests
///
/// POST /api/chat
///
/// The body is validated before the provider is contacted. `choices` and `usage`
/// from the provider are returned unchanged.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    let request = parse_chat_request(&body)?;
    let model = state.settings.resolve_model(request.model.as_deref());

    let log_summary = create_chat_request_log_summary(&request, &model);
    if let Ok(summary_json) = serde_json::to_string_pretty(&log_summary) {
        debug!("📥 Client Request:\n{}", summary_json);
    }

    let response = state
        .provider
        .chat_complete(&model, &request.messages)
        .await
        .upstream_context("Provider request failed")?;

    debug!("Request processing completed");
    Ok(Json(response))
}
