//! In-memory job records keyed by job id.

use std::collections::HashMap;

use prdforge_core::error::CoreError;
use prdforge_core::job::{Job, JobStatus};
use prdforge_core::types::JobId;
use tokio::sync::RwLock;

/// Process-lifetime store of every submitted job.
///
/// Thread-safe via interior `RwLock`; owned by the [`JobTracker`](super::JobTracker)
/// and shared with handlers through application state.
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new record, replacing nothing: ids are freshly generated.
    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }

    /// Snapshot of a single job.
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Apply a fallible mutation under the write lock and return the
    /// updated snapshot.
    ///
    /// The record is left untouched when `f` fails.
    pub async fn update<F>(&self, id: JobId, f: F) -> Result<Job, CoreError>
    where
        F: FnOnce(&mut Job) -> Result<(), CoreError>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: id.to_string(),
        })?;

        let mut next = job.clone();
        f(&mut next)?;
        *job = next;
        Ok(job.clone())
    }

    /// Every job, oldest first.
    pub async fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        jobs
    }

    pub async fn count_by_status(&self, status: JobStatus) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == status)
            .count()
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn job_at(offset_secs: i64) -> Job {
        Job::new(
            uuid::Uuid::new_v4(),
            "Track office plants",
            None,
            Utc::now() + Duration::seconds(offset_secs),
        )
    }

    #[tokio::test]
    async fn insert_then_get_returns_snapshot() {
        let store = JobStore::new();
        let job = job_at(0);
        store.insert(job.clone()).await;

        assert_eq!(store.get(job.id).await, Some(job));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let store = JobStore::new();
        assert!(store.get(uuid::Uuid::new_v4()).await.is_none());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_applies_transition() {
        let store = JobStore::new();
        let job = job_at(0);
        store.insert(job.clone()).await;

        let updated = store.update(job.id, Job::mark_processing).await.unwrap();
        assert_eq!(updated.status, JobStatus::Processing);
        assert_eq!(store.get(job.id).await.unwrap().status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn failed_update_leaves_record_unchanged() {
        let store = JobStore::new();
        let job = job_at(0);
        store.insert(job.clone()).await;

        let result = store
            .update(job.id, |j| {
                j.project_name = Some("changed".into());
                Err(CoreError::Conflict("nope".into()))
            })
            .await;

        assert_matches!(result, Err(CoreError::Conflict(_)));
        assert_eq!(store.get(job.id).await, Some(job));
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let store = JobStore::new();
        let result = store.update(uuid::Uuid::new_v4(), Job::mark_processing).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "Job", .. }));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation_time() {
        let store = JobStore::new();
        let late = job_at(10);
        let early = job_at(-10);
        let middle = job_at(0);
        for job in [late.clone(), early.clone(), middle.clone()] {
            store.insert(job).await;
        }

        let ids: Vec<JobId> = store.list().await.into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![early.id, middle.id, late.id]);
    }

    #[tokio::test]
    async fn counts_by_status() {
        let store = JobStore::new();
        let a = job_at(0);
        let b = job_at(1);
        store.insert(a.clone()).await;
        store.insert(b).await;
        store.update(a.id, Job::mark_processing).await.unwrap();

        assert_eq!(store.count_by_status(JobStatus::Pending).await, 1);
        assert_eq!(store.count_by_status(JobStatus::Processing).await, 1);
        assert_eq!(store.count_by_status(JobStatus::Completed).await, 0);
    }
}
