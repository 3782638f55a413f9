use prdforge_llm::LlmError;

/// Errors raised while generating or storing a job's artifacts.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The language model request failed.
    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),

    /// A stage reply did not contain a usable deliverable.
    #[error("The {stage} stage produced no usable output: {reason}")]
    Extraction { stage: &'static str, reason: String },

    /// Writing an artifact file failed.
    #[error("Failed to write artifacts: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing an artifact failed.
    #[error("Failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}
