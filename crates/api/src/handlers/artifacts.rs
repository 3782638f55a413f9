//! Handlers for the `/artifacts` resource.
//!
//! Artifacts exist only once a job is `completed`; asking earlier is a
//! client error (400), asking for an unknown job or kind is a 404.

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use prdforge_core::job::ArtifactKind;
use prdforge_core::types::JobId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{artifact_url, parse_job_id};
use crate::response::DataResponse;
use crate::state::AppState;

/// Locations of a completed job's artifacts.
#[derive(Debug, Serialize)]
pub struct ArtifactListing {
    pub job_id: JobId,
    pub artifacts: BTreeMap<ArtifactKind, PathBuf>,
    pub download_urls: BTreeMap<ArtifactKind, String>,
}

/// GET /api/v1/artifacts/{id}
pub async fn list_artifacts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ArtifactListing>>> {
    let job_id = parse_job_id(&id)?;
    let artifacts = state.tracker.artifacts(job_id).await?;

    let download_urls = artifacts
        .keys()
        .map(|kind| (*kind, artifact_url(job_id, kind)))
        .collect();

    Ok(Json(DataResponse {
        data: ArtifactListing {
            job_id,
            artifacts,
            download_urls,
        },
    }))
}

/// GET /api/v1/artifacts/{id}/{kind}
///
/// Stream one artifact file with its media type and an attachment
/// `Content-Disposition`.
pub async fn download_artifact(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let job_id = parse_job_id(&id)?;
    let kind: ArtifactKind = kind.parse()?;
    let path = state.tracker.artifact(job_id, kind).await?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        AppError::InternalError(format!(
            "Failed to read artifact {}: {e}",
            path.display()
        ))
    })?;

    tracing::debug!(job_id = %job_id, kind = %kind, size = bytes.len(), "Serving artifact");

    let headers = [
        (header::CONTENT_TYPE, kind.media_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", kind.file_name()),
        ),
    ];
    Ok((headers, bytes))
}
