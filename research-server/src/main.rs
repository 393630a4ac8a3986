//! Research Server binary
//!
//! Loads configuration (research.toml, `RESEARCH_*` and `GEMINI_API_KEY`),
//! then serves the research API on `server.host:server.port`.

use anyhow::Context;
use research_core::config::ResearchConfig;
use research_core::jobs::JobRunner;
use research_server::{AppState, router};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ResearchConfig::load().context("failed to load configuration")?;
    let runner = Arc::new(JobRunner::from_config(&config));
    let app = router(AppState::new(runner));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        %addr,
        model = %config.llm.model,
        max_concurrent_jobs = config.server.max_concurrent_jobs,
        "Research server listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
