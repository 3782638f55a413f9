//! Handlers for job submission and the example catalogue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use prdforge_core::generation::{ExampleProblem, GenerationRequest, EXAMPLE_PROBLEMS};
use prdforge_core::job::JobStatus;
use prdforge_core::types::JobId;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body returned when a job is accepted.
#[derive(Debug, Serialize)]
pub struct GenerationAccepted {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
    pub artifacts_url: String,
}

/// POST /api/v1/generate
///
/// Validate the request, store a `pending` job and return 202 right away.
/// Generation continues in the background; poll `/jobs/{id}` or listen on
/// the WebSocket for progress.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let request = input.validated()?;
    let job = state.tracker.submit(request).await;

    let accepted = GenerationAccepted {
        job_id: job.id,
        status: job.status,
        message: format!("PRD generation started. Check status at /api/v1/jobs/{}", job.id),
        artifacts_url: format!("/api/v1/artifacts/{}", job.id),
    };

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: accepted })))
}

/// GET /api/v1/examples
pub async fn list_examples() -> Json<DataResponse<&'static [ExampleProblem]>> {
    Json(DataResponse {
        data: &EXAMPLE_PROBLEMS,
    })
}
