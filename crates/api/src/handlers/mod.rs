pub mod artifacts;
pub mod generation;
pub mod jobs;

use prdforge_core::error::CoreError;
use prdforge_core::types::JobId;

use crate::error::AppResult;

/// Parse a job id from a path segment.
///
/// A malformed id can never name a job, so it is reported as not found
/// rather than as a bad request.
pub(crate) fn parse_job_id(raw: &str) -> AppResult<JobId> {
    raw.parse().map_err(|_| {
        CoreError::NotFound {
            entity: "Job",
            id: raw.to_string(),
        }
        .into()
    })
}

/// Download URL of one artifact, relative to the server root.
pub(crate) fn artifact_url(job_id: JobId, kind: impl std::fmt::Display) -> String {
    format!("/api/v1/artifacts/{job_id}/{kind}")
}
