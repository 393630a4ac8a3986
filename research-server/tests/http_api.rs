//! Integration tests for the research HTTP API.
//!
//! Jobs run against a scripted reasoner so no request leaves the process; a
//! semaphore gate holds jobs in `processing` where a test needs that.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use research_core::prelude::*;
use research_server::{AppState, router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tower::ServiceExt;

fn factory(reasoner: Arc<ScriptedReasoner>) -> AgentFactory {
    Arc::new(move || {
        ResearchAgent::builder()
            .llm(Arc::new(
                ScriptedProvider::new(Vec::<&str>::new()).with_fallback("FINAL REPORT"),
            ))
            .reasoner(reasoner.clone())
            .pacing(PacingPolicy::none())
            .pacer(Arc::new(RecordingPacer::new()))
            .build()
    })
}

fn open_reasoner() -> Arc<ScriptedReasoner> {
    Arc::new(ScriptedReasoner::new(Vec::<&str>::new()).with_fallback("an answer"))
}

fn gated_reasoner(gate: Arc<Semaphore>) -> Arc<ScriptedReasoner> {
    Arc::new(
        ScriptedReasoner::new(Vec::<&str>::new())
            .with_fallback("an answer")
            .with_gate(gate),
    )
}

fn app_with(runner: JobRunner) -> axum::Router {
    router(AppState::new(Arc::new(runner)))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn start(app: &axum::Router, topic: &str, questions: &[&str]) -> String {
    let (status, json) = post(
        app,
        "/api/research",
        json!({ "topic": topic, "questions": questions }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["research_id"].as_str().unwrap().to_string()
}

async fn wait_for(app: &axum::Router, id: &str, wanted: &str) -> Value {
    for _ in 0..200 {
        let (_, json) = get(app, &format!("/api/research/{}", id)).await;
        if json["status"] == wanted {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {} never reached {}", id, wanted);
}

// --- POST /api/research ---

#[tokio::test]
async fn test_start_returns_id_immediately() {
    let app = app_with(JobRunner::new(factory(open_reasoner())));
    let (status, json) = post(
        &app,
        "/api/research",
        json!({ "topic": "Solar", "questions": ["Why?"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "started");
    assert_eq!(json["message"], "Research started successfully");
    assert!(json["research_id"].as_str().unwrap().starts_with("research_"));
}

#[tokio::test]
async fn test_blank_submissions_are_rejected_and_not_recorded() {
    let app = app_with(JobRunner::new(factory(open_reasoner())));

    for body in [
        json!({ "topic": "", "questions": ["a"] }),
        json!({ "topic": "T", "questions": ["", "  "] }),
        json!({ "topic": "   ", "questions": ["a"] }),
        json!({ "questions": ["a"] }),
        json!({ "topic": "T" }),
    ] {
        let (status, json) = post(&app, "/api/research", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Topic and questions are required");
    }

    let (status, json) = get(&app, "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["history"], json!([]));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app_with(JobRunner::new(factory(open_reasoner())));
    let request = Request::builder()
        .method("POST")
        .uri("/api/research")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

// --- GET /api/research/:id ---

#[tokio::test]
async fn test_unknown_research_is_not_found() {
    let app = app_with(JobRunner::new(factory(open_reasoner())));

    let (status, json) = get(&app, "/api/research/research_19700101_000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Research not found");

    let (status, json) = get(&app, "/api/research/research_19700101_000000/report").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Research not found");
}

#[tokio::test]
async fn test_processing_then_completed() {
    let gate = Arc::new(Semaphore::new(0));
    let app = app_with(JobRunner::new(factory(gated_reasoner(gate.clone()))));
    let id = start(&app, " Wind Power ", &["Cost?", "  ", "Output?"]).await;

    let (status, json) = get(&app, &format!("/api/research/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "processing");
    assert_eq!(json["topic"], "Wind Power");
    assert_eq!(json["questions"], json!(["Cost?", "Output?"]));
    assert!(json["started_at"].is_string());
    assert!(json.get("report").is_none());

    let (status, json) = get(&app, &format!("/api/research/{}/report", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Research not completed yet");

    gate.add_permits(2);
    let job = wait_for(&app, &id, "completed").await;
    assert_eq!(job["report"], "FINAL REPORT");
    assert_eq!(
        job["results"],
        json!({ "Cost?": "an answer", "Output?": "an answer" })
    );
    assert!(job["completed_at"].is_string());

    let (status, json) = get(&app, &format!("/api/research/{}/report", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "report": job["report"], "topic": "Wind Power" }));
}

#[tokio::test]
async fn test_failed_report_is_recorded_as_error() {
    let factory: AgentFactory = Arc::new(|| {
        ResearchAgent::builder()
            .llm(Arc::new(ScriptedProvider::new(Vec::<&str>::new())))
            .reasoner(open_reasoner())
            .pacing(PacingPolicy::none())
            .build()
    });
    let app = app_with(JobRunner::new(factory));
    let id = start(&app, "T", &["q"]).await;

    let job = wait_for(&app, &id, "error").await;
    assert!(!job["error"].as_str().unwrap().is_empty());

    let (status, _) = get(&app, &format!("/api/research/{}/report", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- GET /api/history ---

#[tokio::test]
async fn test_history_keeps_last_ten() {
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()));
    let runner = JobRunner::new(factory(open_reasoner())).with_clock(clock.clone());
    let app = app_with(runner);

    let mut ids = Vec::new();
    for i in 0..12 {
        ids.push(start(&app, &format!("Topic {}", i), &["q"]).await);
        clock.advance(chrono::Duration::seconds(1));
    }

    let (status, json) = get(&app, "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    let history = json["history"].as_array().unwrap();
    assert_eq!(history.len(), 10);

    let listed: Vec<&str> = history.iter().map(|h| h["id"].as_str().unwrap()).collect();
    let expected: Vec<&str> = ids[2..].iter().map(String::as_str).collect();
    assert_eq!(listed, expected);

    let first = &history[0];
    assert_eq!(first["topic"], "Topic 2");
    for key in ["id", "topic", "status", "started_at", "completed_at"] {
        assert!(first.get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_same_second_submissions_collide() {
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()));
    let gate = Arc::new(Semaphore::new(0));
    let runner = JobRunner::new(factory(gated_reasoner(gate))).with_clock(clock);
    let app = app_with(runner);

    let first = start(&app, "First", &["q"]).await;
    let second = start(&app, "Second", &["q"]).await;
    assert_eq!(first, "research_20240501_090000");
    assert_eq!(first, second);

    let (_, json) = get(&app, &format!("/api/research/{}", first)).await;
    assert_eq!(json["topic"], "Second");

    let (_, json) = get(&app, "/api/history").await;
    assert_eq!(json["history"].as_array().unwrap().len(), 1);
}
