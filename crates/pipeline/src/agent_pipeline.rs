//! LLM-backed generation: three author/reviewer stages run in sequence.
//!
//! 1. The requirements analyst writes user stories for the problem.
//! 2. The product manager turns the stories into a PRD.
//! 3. The technical architect designs a schema from the PRD.
//!
//! Each draft goes to the quality reviewer. Feedback sends the draft back
//! to its author until the reviewer approves or the revision budget runs
//! out; the latest draft is used either way.

use std::sync::Arc;

use async_trait::async_trait;
use prdforge_core::extract::{extract_content, is_approval, ContentFormat};
use prdforge_core::generation::GenerationRequest;
use prdforge_core::user_story::{parse_user_stories, validate_user_stories};
use prdforge_llm::{LlmProvider, Message};

use crate::agents::{AgentRole, PRODUCT_MANAGER, QUALITY_REVIEWER, REQUIREMENTS_ANALYST, TECHNICAL_ARCHITECT};
use crate::error::PipelineError;
use crate::generator::{GeneratedArtifacts, Generator};
use crate::prompts;
use crate::reporter::JobReporter;

/// Default number of revisions an author may make per stage.
pub const DEFAULT_MAX_REVIEW_ROUNDS: u32 = 2;

/// Sampling and review settings shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Revisions allowed after the first draft.
    pub max_review_rounds: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 4096,
            max_review_rounds: DEFAULT_MAX_REVIEW_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    UserStories,
    Prd,
    Schema,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::UserStories => "user stories",
            Stage::Prd => "PRD",
            Stage::Schema => "schema",
        }
    }

    fn author(self) -> AgentRole {
        match self {
            Stage::UserStories => REQUIREMENTS_ANALYST,
            Stage::Prd => PRODUCT_MANAGER,
            Stage::Schema => TECHNICAL_ARCHITECT,
        }
    }

    fn format(self) -> ContentFormat {
        match self {
            Stage::UserStories => ContentFormat::Json,
            Stage::Prd => ContentFormat::Markdown,
            Stage::Schema => ContentFormat::Sql,
        }
    }
}

/// Generator that role-plays the agent team against a language model.
pub struct AgentPipeline {
    provider: Arc<dyn LlmProvider>,
    settings: PipelineSettings,
}

impl AgentPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: PipelineSettings) -> Self {
        Self { provider, settings }
    }

    /// Run one author/reviewer stage and return the extracted deliverable.
    async fn run_stage(
        &self,
        stage: Stage,
        task: String,
        reporter: &JobReporter,
    ) -> Result<String, PipelineError> {
        let author = stage.author();
        tracing::info!(job_id = %reporter.job_id(), stage = stage.name(), agent = author.name, "Stage started");
        reporter.log(format!("{} is working on the {}...", author.name, stage.name()));

        let mut conversation = vec![Message::system(author.system_message), Message::user(task)];
        let mut draft = self.ask(author, &conversation, reporter).await?;

        for revision in 0..=self.settings.max_review_rounds {
            let review = self
                .ask(
                    QUALITY_REVIEWER,
                    &[
                        Message::system(QUALITY_REVIEWER.system_message),
                        Message::user(prompts::review_task(stage.name(), &draft)),
                    ],
                    reporter,
                )
                .await?;

            if is_approval(&review) {
                reporter.log(format!("{} approved the {}", QUALITY_REVIEWER.name, stage.name()));
                break;
            }
            if revision == self.settings.max_review_rounds {
                reporter.log(format!(
                    "The {} was not approved after {revision} revision(s); keeping the latest draft",
                    stage.name()
                ));
                break;
            }

            conversation.push(Message::assistant(draft));
            conversation.push(Message::user(prompts::revision_task(&review)));
            draft = self.ask(author, &conversation, reporter).await?;
        }

        extract_content(&draft, stage.format()).ok_or_else(|| PipelineError::Extraction {
            stage: stage.name(),
            reason: format!("{} reply contained no {:?} content", author.name, stage.format()),
        })
    }

    async fn ask(
        &self,
        agent: AgentRole,
        messages: &[Message],
        reporter: &JobReporter,
    ) -> Result<String, PipelineError> {
        let reply = self
            .provider
            .complete(
                messages.to_vec(),
                self.settings.temperature,
                self.settings.max_tokens,
            )
            .await?;
        reporter.agent_message(agent.name, &reply);
        Ok(reply)
    }
}

#[async_trait]
impl Generator for AgentPipeline {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        reporter: &JobReporter,
    ) -> Result<GeneratedArtifacts, PipelineError> {
        let problem = &request.problem_statement;

        // Stage 1: user stories.
        let raw_stories = self
            .run_stage(Stage::UserStories, prompts::user_stories_task(problem), reporter)
            .await?;
        let stories = parse_user_stories(&raw_stories).map_err(|e| PipelineError::Extraction {
            stage: Stage::UserStories.name(),
            reason: e.to_string(),
        })?;
        for issue in validate_user_stories(&stories) {
            reporter.log(format!("User story check: {issue}"));
        }
        let user_stories = serde_json::to_string_pretty(&stories)?;
        reporter.log(format!("Generated {} user stories", stories.len()));

        // Stage 2: PRD.
        let prd = self
            .run_stage(Stage::Prd, prompts::prd_task(problem, &user_stories), reporter)
            .await?;

        // Stage 3: schema.
        let schema = self
            .run_stage(Stage::Schema, prompts::schema_task(&prd), reporter)
            .await?;

        Ok(GeneratedArtifacts {
            user_stories,
            prd,
            schema,
        })
    }
}
