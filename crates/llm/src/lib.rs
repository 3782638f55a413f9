//! Language-model providers used by the generation pipeline.
//!
//! Every backend implements [`LlmProvider`]; [`create_provider`] picks one
//! from [`LlmConfig`].

pub mod config;
pub mod provider;
pub mod providers;

pub use config::LlmConfig;
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
