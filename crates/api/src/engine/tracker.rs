//! Accepts generation requests and drives each job to a terminal state.
//!
//! [`JobTracker::submit`] stores a `pending` record and spawns one task per
//! job. The task moves the record to `processing`, runs the configured
//! [`Generator`], writes the artifacts and finishes in `completed` or
//! `failed`. Every transition is published on the event bus.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use prdforge_core::error::CoreError;
use prdforge_core::generation::GenerationRequest;
use prdforge_core::job::{ArtifactKind, ArtifactPaths, Job, JobStatus};
use prdforge_core::job_events::{
    EVENT_JOB_COMPLETED, EVENT_JOB_FAILED, EVENT_JOB_PROCESSING, EVENT_JOB_SUBMITTED,
};
use prdforge_core::types::JobId;
use prdforge_events::{EventBus, JobEvent};
use prdforge_pipeline::{ArtifactWriter, Generator, JobReporter, PipelineError};

use crate::engine::store::JobStore;
use crate::error::{AppError, AppResult};

/// Owns the job store and runs submitted jobs in the background.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct JobTracker {
    store: Arc<JobStore>,
    generator: Arc<dyn Generator>,
    writer: ArtifactWriter,
    event_bus: Arc<EventBus>,
}

impl JobTracker {
    pub fn new(
        generator: Arc<dyn Generator>,
        writer: ArtifactWriter,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            store: Arc::new(JobStore::new()),
            generator,
            writer,
            event_bus,
        }
    }

    /// Name of the generator backing this tracker.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Store a `pending` job and schedule its generation.
    ///
    /// Returns as soon as the record exists; the work runs on its own task.
    pub async fn submit(&self, request: GenerationRequest) -> Job {
        let job = Job::new(
            uuid::Uuid::new_v4(),
            request.problem_statement.clone(),
            request.project_name.clone(),
            Utc::now(),
        );
        let job_id = job.id;

        self.store.insert(job.clone()).await;
        self.publish(EVENT_JOB_SUBMITTED, job_id, status_payload(JobStatus::Pending));
        tracing::info!(job_id = %job_id, generator = self.generator.name(), "Job submitted");

        tokio::spawn(self.clone().run(job_id, request));
        job
    }

    /// Current record of a job.
    pub async fn get_status(&self, job_id: JobId) -> Result<Job, CoreError> {
        self.store.get(job_id).await.ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })
    }

    /// Every job, oldest first.
    pub async fn list(&self) -> Vec<Job> {
        self.store.list().await
    }

    /// Number of jobs currently `processing`.
    pub async fn active_count(&self) -> usize {
        self.store.count_by_status(JobStatus::Processing).await
    }

    /// Artifact paths of a completed job.
    ///
    /// 404 for an unknown job, 400 while the job is not `completed`.
    pub async fn artifacts(&self, job_id: JobId) -> AppResult<ArtifactPaths> {
        let job = self.get_status(job_id).await?;
        if job.status != JobStatus::Completed {
            return Err(AppError::BadRequest(format!(
                "Job status is '{}'. Artifacts are only available when status is 'completed'",
                job.status
            )));
        }
        Ok(job.artifacts.unwrap_or_default())
    }

    /// On-disk path of one artifact of a completed job.
    ///
    /// 404 when the job, the kind or the file itself is missing; 400 while
    /// the job is not `completed`.
    pub async fn artifact(&self, job_id: JobId, kind: ArtifactKind) -> AppResult<PathBuf> {
        let artifacts = self.artifacts(job_id).await?;
        let path = artifacts
            .get(&kind)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Artifact",
                id: format!("{job_id}/{kind}"),
            })?;

        ensure_artifact_file(&path, job_id, kind).await?;
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Background task
    // -----------------------------------------------------------------------

    async fn run(self, job_id: JobId, request: GenerationRequest) {
        if let Err(e) = self.store.update(job_id, Job::mark_processing).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to start job");
            return;
        }
        self.publish(
            EVENT_JOB_PROCESSING,
            job_id,
            status_payload(JobStatus::Processing),
        );
        tracing::info!(job_id = %job_id, "Job processing");

        let reporter = JobReporter::new(Arc::clone(&self.event_bus), job_id);
        let outcome = AssertUnwindSafe(self.produce(&request, &reporter))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => Err(format!(
                "generation task panicked: {}",
                panic_message(panic.as_ref())
            )),
        };

        match result {
            Ok(paths) => self.complete(job_id, paths).await,
            Err(error) => self.fail(job_id, error).await,
        }
    }

    async fn produce(
        &self,
        request: &GenerationRequest,
        reporter: &JobReporter,
    ) -> Result<ArtifactPaths, PipelineError> {
        let artifacts = self.generator.generate(request, reporter).await?;
        reporter.log("Writing artifacts");
        self.writer.write(reporter.job_id(), &artifacts).await
    }

    async fn complete(&self, job_id: JobId, paths: ArtifactPaths) {
        let kinds: Vec<&str> = paths.keys().map(|k| k.as_str()).collect();
        let payload = serde_json::json!({
            "status": JobStatus::Completed,
            "artifacts": kinds,
        });

        match self
            .store
            .update(job_id, |job| job.mark_completed(paths, Utc::now()))
            .await
        {
            Ok(_) => {
                self.publish(EVENT_JOB_COMPLETED, job_id, payload);
                tracing::info!(job_id = %job_id, "Job completed");
            }
            Err(e) => self.fail(job_id, e.to_string()).await,
        }
    }

    async fn fail(&self, job_id: JobId, error: String) {
        tracing::error!(job_id = %job_id, error = %error, "Job failed");
        let payload = serde_json::json!({
            "status": JobStatus::Failed,
            "error": error,
        });

        match self
            .store
            .update(job_id, |job| job.mark_failed(error, Utc::now()))
            .await
        {
            Ok(_) => self.publish(EVENT_JOB_FAILED, job_id, payload),
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job failure");
            }
        }
    }

    fn publish(&self, event_type: &str, job_id: JobId, payload: serde_json::Value) {
        self.event_bus
            .publish(JobEvent::new(event_type, job_id).with_payload(payload));
    }
}

/// 404 when the artifact file is gone, 500 when it cannot be checked.
async fn ensure_artifact_file(path: &Path, job_id: JobId, kind: ArtifactKind) -> AppResult<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(CoreError::NotFound {
            entity: "Artifact file",
            id: format!("{job_id}/{}", kind.file_name()),
        }
        .into()),
        Err(e) => Err(AppError::InternalError(format!(
            "Failed to check artifact file {}: {e}",
            path.display()
        ))),
    }
}

fn status_payload(status: JobStatus) -> serde_json::Value {
    serde_json::json!({ "status": status })
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
