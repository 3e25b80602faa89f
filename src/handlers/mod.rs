//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod chat;
pub mod health;

use crate::config::Settings;
use crate::middleware::{payload_limit_middleware, request_logging_middleware};
use crate::services::{CompletionProvider, UpstreamClient};
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Application state
///
/// Read-only after startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub provider: Arc<dyn CompletionProvider>,
}

/// Create application router backed by the real upstream client
pub async fn create_router(settings: Settings) -> Result<Router> {
    let provider = UpstreamClient::new(settings.upstream.clone())?;
    Ok(create_router_with_provider(settings, Arc::new(provider)))
}

/// Create application router with an explicit completion provider
pub fn create_router_with_provider(
    settings: Settings,
    provider: Arc<dyn CompletionProvider>,
) -> Router {
    let max_request_size = settings.request.max_request_size;
    let cors = build_cors_layer(&settings);

    let app_state = Arc::new(AppState { settings, provider });

    let router = Router::new()
        .route("/api/chat", post(chat::handle_chat))
        .route("/health", get(health::health_check))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(middleware::from_fn_with_state(
                    max_request_size,
                    payload_limit_middleware,
                ))
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_request_size)),
        );

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn build_cors_layer(settings: &Settings) -> Option<CorsLayer> {
    if !settings.security.cors_enabled {
        return None;
    }

    let origins = &settings.security.allowed_origins;
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(parsed)))
}
