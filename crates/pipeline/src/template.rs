//! Offline generator producing placeholder documents.
//!
//! Used when no language model is configured so the job flow, downloads
//! and WebSocket updates can be exercised end to end.

use std::time::Duration;

use async_trait::async_trait;
use prdforge_core::generation::GenerationRequest;
use prdforge_core::user_story::UserStory;

use crate::error::PipelineError;
use crate::generator::{GeneratedArtifacts, Generator};
use crate::reporter::JobReporter;

/// Deterministic placeholder generator.
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator {
    delay: Duration,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause before producing output, to mimic model latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Generator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        reporter: &JobReporter,
    ) -> Result<GeneratedArtifacts, PipelineError> {
        reporter.log("Generating placeholder artifacts (no language model configured)");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let problem = &request.problem_statement;
        let title = request
            .project_name
            .as_deref()
            .unwrap_or("Product Requirements Document");

        let stories = vec![UserStory {
            id: 1,
            persona: "New Hire".to_string(),
            user_story: format!("As a new hire, I want {problem}"),
            acceptance_criteria: vec![
                "Given I am a new hire".to_string(),
                "When I access the system".to_string(),
                "Then I can complete onboarding".to_string(),
            ],
        }];

        let prd = format!(
            "# {title}\n\n## Problem Statement\n{problem}\n\n\
             ## Introduction\nPlaceholder document produced without a language model.\n"
        );

        let schema = "CREATE TABLE users (\n    id INTEGER PRIMARY KEY,\n    name TEXT NOT NULL\n);\n"
            .to_string();

        Ok(GeneratedArtifacts {
            user_stories: serde_json::to_string_pretty(&stories)?,
            prd,
            schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use prdforge_core::user_story::parse_user_stories;
    use prdforge_events::EventBus;

    use super::*;

    #[tokio::test]
    async fn embeds_problem_statement() {
        let reporter = JobReporter::new(Arc::new(EventBus::default()), uuid::Uuid::new_v4());
        let request = GenerationRequest {
            problem_statement: "track water intake".into(),
            project_name: Some("hydrate".into()),
        };

        let artifacts = TemplateGenerator::new()
            .generate(&request, &reporter)
            .await
            .unwrap();

        assert!(artifacts.prd.starts_with("# hydrate"));
        assert!(artifacts.prd.contains("track water intake"));
        assert!(artifacts.schema.contains("CREATE TABLE users"));
        let stories = parse_user_stories(&artifacts.user_stories).unwrap();
        assert_eq!(stories[0].user_story, "As a new hire, I want track water intake");
    }
}
