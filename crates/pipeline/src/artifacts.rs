//! Writes generated documents to the artifact directory.

use std::path::{Path, PathBuf};

use prdforge_core::job::{ArtifactKind, ArtifactPaths};
use prdforge_core::types::JobId;

use crate::error::PipelineError;
use crate::generator::GeneratedArtifacts;

/// Stores each job's artifacts under `<root>/job_<id>/`.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one job's files.
    pub fn job_dir(&self, job_id: JobId) -> PathBuf {
        self.root.join(format!("job_{job_id}"))
    }

    /// Write all three documents and return their paths.
    pub async fn write(
        &self,
        job_id: JobId,
        artifacts: &GeneratedArtifacts,
    ) -> Result<ArtifactPaths, PipelineError> {
        let dir = self.job_dir(job_id);
        tokio::fs::create_dir_all(&dir).await?;

        let mut paths = ArtifactPaths::new();
        for kind in ArtifactKind::ALL {
            let path = dir.join(kind.file_name());
            tokio::fs::write(&path, artifacts.content(kind)).await?;
            paths.insert(kind, path);
        }

        tracing::debug!(job_id = %job_id, dir = %dir.display(), "Artifacts written");
        Ok(paths)
    }
}
