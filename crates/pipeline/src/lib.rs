//! PRD generation workflow.
//!
//! A [`Generator`] turns a [`GenerationRequest`](prdforge_core::generation::GenerationRequest)
//! into the three job artifacts. [`AgentPipeline`] runs role-played
//! language-model agents through the user stories, PRD and schema stages;
//! [`TemplateGenerator`] produces placeholder documents without a model.
//! [`ArtifactWriter`] stores the results on disk.

pub mod agent_pipeline;
pub mod agents;
pub mod artifacts;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod reporter;
pub mod template;

pub use agent_pipeline::{AgentPipeline, PipelineSettings};
pub use artifacts::ArtifactWriter;
pub use error::PipelineError;
pub use generator::{GeneratedArtifacts, Generator};
pub use reporter::JobReporter;
pub use template::TemplateGenerator;
