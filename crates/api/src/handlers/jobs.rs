//! Handlers for the `/jobs` resource.

use axum::extract::{Path, State};
use axum::Json;
use prdforge_core::job::Job;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::parse_job_id;
use crate::response::DataResponse;
use crate::state::AppState;

/// Every tracked job with its total count.
#[derive(Debug, Serialize)]
pub struct JobList {
    pub total_jobs: usize,
    pub jobs: Vec<Job>,
}

/// GET /api/v1/jobs
///
/// All jobs known to this process, oldest first.
pub async fn list_jobs(State(state): State<AppState>) -> Json<DataResponse<JobList>> {
    let jobs = state.tracker.list().await;
    Json(DataResponse {
        data: JobList {
            total_jobs: jobs.len(),
            jobs,
        },
    })
}

/// GET /api/v1/jobs/{id}
///
/// Current record of one job. 404 if the id is unknown or malformed.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job_id = parse_job_id(&id)?;
    let job = state.tracker.get_status(job_id).await?;
    Ok(Json(DataResponse { data: job }))
}
