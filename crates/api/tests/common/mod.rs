#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use prdforge_core::generation::GenerationRequest;
use prdforge_events::EventBus;
use prdforge_pipeline::{ArtifactWriter, GeneratedArtifacts, Generator, JobReporter, PipelineError};
use tower::ServiceExt;

use prdforge_api::config::ServerConfig;
use prdforge_api::engine::JobTracker;
use prdforge_api::router::build_app_router;
use prdforge_api::state::AppState;
use prdforge_api::ws::WsManager;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(artifact_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        artifact_dir: artifact_dir.to_path_buf(),
        max_review_rounds: 2,
    }
}

/// Build application state around the given generator.
pub fn test_state(generator: Arc<dyn Generator>, artifact_dir: &Path) -> AppState {
    let config = test_config(artifact_dir);
    let event_bus = Arc::new(EventBus::default());
    let tracker = Arc::new(JobTracker::new(
        generator,
        ArtifactWriter::new(artifact_dir),
        Arc::clone(&event_bus),
    ));

    AppState {
        config: Arc::new(config),
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
        tracker,
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same builder as `main.rs` so integration tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery).
pub fn build_test_app(generator: Arc<dyn Generator>, artifact_dir: &Path) -> Router {
    let state = test_state(generator, artifact_dir);
    let config = test_config(artifact_dir);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Submit a problem statement and return the new job id.
pub async fn submit(app: &Router, problem: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/generate",
        serde_json::json!({ "problem_statement": problem }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["data"]["job_id"].as_str().unwrap().to_string()
}

/// Poll `GET /api/v1/jobs/{id}` until the job is `completed` or `failed`.
pub async fn wait_for_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let response = get(app.clone(), &format!("/api/v1/jobs/{job_id}")).await;
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            let status = json["data"]["status"].as_str().unwrap().to_string();
            if status == "completed" || status == "failed" {
                return json["data"].clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job should reach a terminal state")
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Always fails with an extraction error.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        reporter: &JobReporter,
    ) -> Result<GeneratedArtifacts, PipelineError> {
        reporter.log("Generating user stories");
        Err(PipelineError::Extraction {
            stage: "user stories",
            reason: "reply contained no JSON".into(),
        })
    }
}
