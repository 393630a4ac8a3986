//! Research Server - HTTP API over background research jobs
//!
//! Exposes four JSON endpoints backed by a [`JobRunner`]:
//!
//! - `POST /api/research` starts a job and returns its id immediately
//! - `GET /api/research/:id` returns the job record
//! - `GET /api/research/:id/report` returns the report once completed
//! - `GET /api/history` lists the most recent jobs
//!
//! ```rust,no_run
//! use research_core::prelude::*;
//! use research_server::{AppState, router};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ResearchConfig::load()?;
//! let state = AppState::new(Arc::new(JobRunner::from_config(&config)));
//! let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod routes;

pub use error::{ApiError, Result};
pub use routes::{History, Started};

use axum::Router;
use axum::routing::{get, post};
use research_core::jobs::JobRunner;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<JobRunner>,
}

impl AppState {
    pub fn new(runner: Arc<JobRunner>) -> Self {
        Self { runner }
    }
}

/// Router with all API routes, CORS open to any origin and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/research", post(routes::start_research))
        .route("/api/research/:id", get(routes::research_status))
        .route("/api/research/:id/report", get(routes::research_report))
        .route("/api/history", get(routes::history))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
