//! Job record and its status machine.
//!
//! A job moves `pending -> processing -> {completed | failed}` and never
//! leaves a terminal state. The transition methods on [`Job`] are the only
//! way to change its status, so the invariants (terminal fields are set
//! exactly once, on the way out of `processing`) hold wherever a job is
//! stored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// `completed` and `failed` are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether `self -> next` is an allowed edge of the status machine.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// The three documents produced for every completed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    UserStories,
    Prd,
    Schema,
}

impl ArtifactKind {
    /// Every kind, in generation order.
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::UserStories,
        ArtifactKind::Prd,
        ArtifactKind::Schema,
    ];

    /// Wire name, also used in download URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::UserStories => "user_stories",
            ArtifactKind::Prd => "prd",
            ArtifactKind::Schema => "schema",
        }
    }

    /// File name inside the job's artifact directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::UserStories => "user_stories.json",
            ArtifactKind::Prd => "prd.md",
            ArtifactKind::Schema => "schema.sql",
        }
    }

    /// Media type served on download.
    pub fn media_type(self) -> &'static str {
        match self {
            ArtifactKind::UserStories => "application/json",
            ArtifactKind::Prd => "text/markdown",
            ArtifactKind::Schema => "application/sql",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Artifact",
                id: s.to_string(),
            })
    }
}

/// Artifact kind to on-disk path.
pub type ArtifactPaths = BTreeMap<ArtifactKind, PathBuf>;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One submitted generation request and its tracked lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "job_id")]
    pub id: JobId,
    pub status: JobStatus,
    pub problem_statement: String,
    pub project_name: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub error: Option<String>,
    pub artifacts: Option<ArtifactPaths>,
}

impl Job {
    /// Create a fresh `pending` job.
    pub fn new(
        id: JobId,
        problem_statement: impl Into<String>,
        project_name: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            problem_statement: problem_statement.into(),
            project_name,
            created_at,
            completed_at: None,
            error: None,
            artifacts: None,
        }
    }

    /// `pending -> processing`.
    pub fn mark_processing(&mut self) -> Result<(), CoreError> {
        self.transition(JobStatus::Processing)
    }

    /// `processing -> completed`. Every [`ArtifactKind`] must be present.
    pub fn mark_completed(
        &mut self,
        artifacts: ArtifactPaths,
        at: Timestamp,
    ) -> Result<(), CoreError> {
        if let Some(missing) = ArtifactKind::ALL
            .into_iter()
            .find(|kind| !artifacts.contains_key(kind))
        {
            return Err(CoreError::Validation(format!(
                "Cannot complete job {} without the '{missing}' artifact",
                self.id
            )));
        }
        self.transition(JobStatus::Completed)?;
        self.completed_at = Some(at);
        self.artifacts = Some(artifacts);
        Ok(())
    }

    /// `processing -> failed`. The error message must be non-empty.
    pub fn mark_failed(&mut self, error: impl Into<String>, at: Timestamp) -> Result<(), CoreError> {
        let error = error.into();
        if error.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Cannot fail job {} without an error message",
                self.id
            )));
        }
        self.transition(JobStatus::Failed)?;
        self.completed_at = Some(at);
        self.error = Some(error);
        Ok(())
    }

    /// Path of a single artifact, if the job has one for `kind`.
    pub fn artifact_path(&self, kind: ArtifactKind) -> Option<&PathBuf> {
        self.artifacts.as_ref().and_then(|a| a.get(&kind))
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "Job {} cannot move from '{}' to '{next}'",
                self.id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn pending_job() -> Job {
        Job::new(uuid::Uuid::new_v4(), "Onboarding tool", None, Utc::now())
    }

    fn all_artifacts() -> ArtifactPaths {
        ArtifactKind::ALL
            .into_iter()
            .map(|kind| (kind, PathBuf::from(kind.file_name())))
            .collect()
    }

    // -- status machine --

    #[test]
    fn only_forward_edges_are_allowed() {
        use JobStatus::*;
        let all = [Pending, Processing, Completed, Failed];
        let allowed = [(Pending, Processing), (Processing, Completed), (Processing, Failed)];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    // -- Job transitions --

    #[test]
    fn new_job_is_pending_without_terminal_fields() {
        let job = pending_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.completed_at.is_none());
        assert!(job.error.is_none());
        assert!(job.artifacts.is_none());
    }

    #[test]
    fn happy_path_sets_artifacts_and_completion_time() {
        let mut job = pending_job();
        job.mark_processing().unwrap();
        assert!(job.completed_at.is_none());

        job.mark_completed(all_artifacts(), Utc::now()).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.artifacts.as_ref().map(|a| a.len()), Some(3));
        assert!(job.error.is_none());
    }

    #[test]
    fn failure_sets_error_and_no_artifacts() {
        let mut job = pending_job();
        job.mark_processing().unwrap();
        job.mark_failed("model unavailable", Utc::now()).unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("model unavailable"));
        assert!(job.artifacts.is_none());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn cannot_complete_from_pending() {
        let mut job = pending_job();
        let err = job.mark_completed(all_artifacts(), Utc::now()).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.artifacts.is_none());
    }

    #[test]
    fn cannot_leave_terminal_state() {
        let mut job = pending_job();
        job.mark_processing().unwrap();
        job.mark_failed("boom", Utc::now()).unwrap();

        assert_matches!(job.mark_processing(), Err(CoreError::Conflict(_)));
        assert_matches!(
            job.mark_completed(all_artifacts(), Utc::now()),
            Err(CoreError::Conflict(_))
        );
        assert_eq!(job.error.as_deref(), Some("boom"));
    }

    #[test]
    fn completion_requires_every_artifact() {
        let mut job = pending_job();
        job.mark_processing().unwrap();

        let mut partial = all_artifacts();
        partial.remove(&ArtifactKind::Schema);

        let err = job.mark_completed(partial, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("schema"));
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn failure_requires_message() {
        let mut job = pending_job();
        job.mark_processing().unwrap();
        assert_matches!(job.mark_failed("  ", Utc::now()), Err(CoreError::Validation(_)));
        assert_eq!(job.status, JobStatus::Processing);
    }

    // -- ArtifactKind --

    #[test]
    fn artifact_kind_parses_wire_names() {
        assert_eq!("prd".parse::<ArtifactKind>().unwrap(), ArtifactKind::Prd);
        assert_eq!(
            "user_stories".parse::<ArtifactKind>().unwrap(),
            ArtifactKind::UserStories
        );
        assert_matches!(
            "slides".parse::<ArtifactKind>(),
            Err(CoreError::NotFound { entity: "Artifact", .. })
        );
    }

    #[test]
    fn job_serializes_with_wire_names() {
        let mut job = pending_job();
        job.mark_processing().unwrap();
        job.mark_completed(all_artifacts(), Utc::now()).unwrap();

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["job_id"], job.id.to_string());
        assert_eq!(json["status"], "completed");
        assert_eq!(json["artifacts"]["user_stories"], "user_stories.json");
        assert_eq!(json["artifacts"]["schema"], "schema.sql");
    }
}
