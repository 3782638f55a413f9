use async_trait::async_trait;
use prdforge_core::generation::GenerationRequest;
use prdforge_core::job::ArtifactKind;

use crate::error::PipelineError;
use crate::reporter::JobReporter;

/// The three generated documents, before they are written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Pretty-printed JSON array of user stories.
    pub user_stories: String,
    /// PRD markdown.
    pub prd: String,
    /// SQL DDL.
    pub schema: String,
}

impl GeneratedArtifacts {
    pub fn content(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::UserStories => &self.user_stories,
            ArtifactKind::Prd => &self.prd,
            ArtifactKind::Schema => &self.schema,
        }
    }
}

/// Produces a job's artifacts from its request.
///
/// The job tracker depends only on this trait; implementations may be
/// slow and non-deterministic.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        request: &GenerationRequest,
        reporter: &JobReporter,
    ) -> Result<GeneratedArtifacts, PipelineError>;
}
