//! Chat Relay Server
//!
//! Accepts chat transcripts on POST /api/chat and forwards them to the upstream provider

use anyhow::{Context, Result};
use chat_relay::utils::logging::init_logging;
use chat_relay::{create_router, version_info, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());
    info!("Server settings loaded");

    let app = create_router(settings.clone()).await?;

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Chat relay server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🔄 Chat endpoint: http://{}/api/chat", addr);
    info!("🤖 Default model: {}", settings.upstream.default_model);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
