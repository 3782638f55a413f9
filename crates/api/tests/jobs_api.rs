//! Integration tests for job submission, status and artifact downloads.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get, post_json, submit, wait_for_terminal, FailingGenerator};
use prdforge_pipeline::TemplateGenerator;
use serde_json::json;

fn template_app(dir: &tempfile::TempDir) -> axum::Router {
    common::build_test_app(Arc::new(TemplateGenerator::new()), dir.path())
}

// ---------------------------------------------------------------------------
// Test: POST /generate returns 202 with a pending job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_accepted_pending_job() {
    let dir = tempfile::tempdir().unwrap();
    let slow = TemplateGenerator::new().with_delay(Duration::from_secs(30));
    let app = common::build_test_app(Arc::new(slow), dir.path());

    let response = post_json(
        app,
        "/api/v1/generate",
        json!({ "problem_statement": "X", "project_name": "demo" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    let job_id = json["data"]["job_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(job_id).is_ok());
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(
        json["data"]["artifacts_url"],
        format!("/api/v1/artifacts/{job_id}")
    );
}

// ---------------------------------------------------------------------------
// Test: a submitted job completes with three artifacts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitted_job_completes_with_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);

    let job_id = submit(&app, "X").await;
    let job = wait_for_terminal(&app, &job_id).await;

    assert_eq!(job["status"], "completed");
    assert!(job["completed_at"].is_string());
    assert!(job["error"].is_null());
    let artifacts = job["artifacts"].as_object().unwrap();
    assert_eq!(artifacts.len(), 3);
    for kind in ["user_stories", "prd", "schema"] {
        assert!(artifacts.contains_key(kind), "missing {kind}");
    }
}

// ---------------------------------------------------------------------------
// Test: a failing generator leaves the job failed with an error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_generation_marks_job_failed() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(Arc::new(FailingGenerator), dir.path());

    let job_id = submit(&app, "X").await;
    let job = wait_for_terminal(&app, &job_id).await;

    assert_eq!(job["status"], "failed");
    assert!(job["artifacts"].is_null());
    let error = job["error"].as_str().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("reply contained no JSON"), "unexpected error: {error}");

    // Artifacts of a failed job are never available.
    let response = get(app, &format!("/api/v1/artifacts/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: validation errors return 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_problem_statement_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_json(
        template_app(&dir),
        "/api/v1/generate",
        json!({ "problem_statement": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_project_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let response = post_json(
        template_app(&dir),
        "/api/v1/generate",
        json!({ "problem_statement": "X", "project_name": "../etc" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: unknown and malformed job ids return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);
    let unknown = uuid::Uuid::new_v4();

    let response = get(app.clone(), &format!("/api/v1/jobs/{unknown}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get(app.clone(), &format!("/api/v1/artifacts/{unknown}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("/api/v1/artifacts/{unknown}/prd")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_job_id_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(template_app(&dir), "/api/v1/jobs/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: artifacts requested before completion return 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn artifacts_before_completion_return_400() {
    let dir = tempfile::tempdir().unwrap();
    let slow = TemplateGenerator::new().with_delay(Duration::from_secs(30));
    let app = common::build_test_app(Arc::new(slow), dir.path());

    let job_id = submit(&app, "X").await;

    let response = get(app.clone(), &format!("/api/v1/artifacts/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get(app, &format!("/api/v1/artifacts/{job_id}/schema")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: artifact listing and downloads of a completed job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completed_job_lists_download_urls() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);

    let job_id = submit(&app, "Plan a team offsite").await;
    wait_for_terminal(&app, &job_id).await;

    let response = get(app, &format!("/api/v1/artifacts/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["job_id"], job_id);
    assert_eq!(
        json["data"]["download_urls"]["prd"],
        format!("/api/v1/artifacts/{job_id}/prd")
    );
    assert_eq!(json["data"]["download_urls"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn download_serves_file_with_media_type() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);

    let job_id = submit(&app, "Plan a team offsite").await;
    wait_for_terminal(&app, &job_id).await;

    let response = get(app.clone(), &format!("/api/v1/artifacts/{job_id}/prd")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/markdown");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"prd.md\""
    );
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("Plan a team offsite"));

    let response = get(app, &format!("/api/v1/artifacts/{job_id}/user_stories")).await;
    assert_eq!(response.headers()["content-type"], "application/json");
    let stories: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(stories.is_array());
}

#[tokio::test]
async fn unknown_artifact_kind_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);

    let job_id = submit(&app, "X").await;
    wait_for_terminal(&app, &job_id).await;

    let response = get(app, &format!("/api/v1/artifacts/{job_id}/pdf")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: GET /jobs lists every submitted job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_jobs_reports_total() {
    let dir = tempfile::tempdir().unwrap();
    let app = template_app(&dir);

    let first = submit(&app, "first").await;
    let second = submit(&app, "second").await;

    let response = get(app, "/api/v1/jobs").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_jobs"], 2);
    let ids: Vec<&str> = json["data"]["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["job_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));
}

// ---------------------------------------------------------------------------
// Test: GET /examples returns three problem statements
// ---------------------------------------------------------------------------

#[tokio::test]
async fn examples_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(template_app(&dir), "/api/v1/examples").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let examples = json["data"].as_array().unwrap();
    assert_eq!(examples.len(), 3);
    assert!(examples
        .iter()
        .all(|e| e["name"].is_string() && e["problem_statement"].is_string()));
}
