use std::fmt;
use std::str::FromStr;

use crate::provider::LlmError;

/// Which backend produces the agent replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    /// No model; deterministic placeholder documents.
    Template,
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "template" | "offline" => Ok(ProviderKind::Template),
            other => Err(LlmError::NotConfigured(format!(
                "unknown LLM provider: '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Template => "template",
        })
    }
}

/// Language-model configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                                   |
    /// |-------------------|-------------------------------------------|
    /// | `LLM_PROVIDER`    | `openai` if `OPENAI_API_KEY` is set, else `gemini` if `GOOGLE_API_KEY` is set, else `template` |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com`                  |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`                             |
    /// | `GEMINI_MODEL`    | `gemini-2.5-pro`                          |
    /// | `LLM_TEMPERATURE` | `0.3`                                     |
    /// | `LLM_MAX_TOKENS`  | `4096`                                    |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = non_empty("OPENAI_API_KEY");
        let google_api_key = non_empty("GOOGLE_API_KEY");

        let provider = match non_empty("LLM_PROVIDER") {
            Some(name) => name
                .parse()
                .unwrap_or_else(|e| panic!("LLM_PROVIDER is invalid: {e}")),
            None if openai_api_key.is_some() => ProviderKind::OpenAi,
            None if google_api_key.is_some() => ProviderKind::Gemini,
            None => ProviderKind::Template,
        };

        let temperature: f32 = non_empty("LLM_TEMPERATURE")
            .unwrap_or_else(|| "0.3".into())
            .parse()
            .expect("LLM_TEMPERATURE must be a valid f32");

        let max_tokens: u32 = non_empty("LLM_MAX_TOKENS")
            .unwrap_or_else(|| "4096".into())
            .parse()
            .expect("LLM_MAX_TOKENS must be a valid u32");

        Self {
            provider,
            openai_api_key,
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".into()),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
            google_api_key,
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-pro".into()),
            temperature,
            max_tokens,
        }
    }
}

/// Whether an OpenAI key has one of the known prefixes.
///
/// Project (`sk-proj-`) and service-account (`sk-svcacct-`) keys are
/// accepted as-is; legacy `sk-` keys must be longer than 20 characters.
pub fn is_recognized_openai_key(key: &str) -> bool {
    key.starts_with("sk-proj-")
        || key.starts_with("sk-svcacct-")
        || (key.starts_with("sk-") && key.len() > 20)
}
