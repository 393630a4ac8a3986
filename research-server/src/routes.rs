//! Axum route handlers for the research API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use research_core::jobs::{JobReport, JobSummary, ResearchJob, ResearchSubmission};
use serde::Serialize;

use crate::AppState;
use crate::error::{ApiError, Result};

#[derive(Debug, Serialize)]
pub struct Started {
    pub research_id: String,
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct History {
    pub history: Vec<JobSummary>,
}

// POST /api/research
pub async fn start_research(
    State(state): State<AppState>,
    body: std::result::Result<Json<ResearchSubmission>, JsonRejection>,
) -> Result<Json<Started>> {
    let Json(submission) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected research request body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let research_id = state.runner.submit(submission).await?;
    Ok(Json(Started {
        research_id,
        status: "started",
        message: "Research started successfully",
    }))
}

// GET /api/research/:id
pub async fn research_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResearchJob>> {
    Ok(Json(state.runner.status(&id).await?))
}

// GET /api/research/:id/report
pub async fn research_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobReport>> {
    Ok(Json(state.runner.report(&id).await?))
}

// GET /api/history
pub async fn history(State(state): State<AppState>) -> Result<Json<History>> {
    Ok(Json(History {
        history: state.runner.history().await?,
    }))
}
