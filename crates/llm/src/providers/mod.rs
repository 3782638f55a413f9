pub mod gemini;
pub mod openai;

use std::sync::Arc;

use crate::config::{is_recognized_openai_key, LlmConfig, ProviderKind};
use crate::provider::{LlmError, LlmProvider};

/// Create the LLM provider selected by `config`.
///
/// Fails with [`LlmError::NotConfigured`] when the required API key is
/// missing or the template backend is selected (it has no model).
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider {
        ProviderKind::OpenAi => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            if !is_recognized_openai_key(api_key) {
                tracing::warn!("OPENAI_API_KEY format not recognized; requests may be rejected");
            }
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )))
        }
        ProviderKind::Gemini => {
            let api_key = config
                .google_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                config.gemini_model.clone(),
            )))
        }
        ProviderKind::Template => Err(LlmError::NotConfigured(
            "template backend has no language model".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(provider: &str, openai: Option<&str>, google: Option<&str>) -> LlmConfig {
        LlmConfig::from_vars(|key| match key {
            "LLM_PROVIDER" => Some(provider.to_string()),
            "OPENAI_API_KEY" => openai.map(str::to_string),
            "GOOGLE_API_KEY" => google.map(str::to_string),
            _ => None,
        })
    }

    #[test]
    fn creates_openai_provider() {
        let provider = create_provider(&config("openai", Some("sk-proj-abc"), None)).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn creates_gemini_provider() {
        let provider = create_provider(&config("gemini", None, Some("g-key"))).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = create_provider(&config("openai", None, None)).err().unwrap();
        assert_matches!(err, LlmError::NotConfigured(msg) if msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn template_has_no_provider() {
        assert_matches!(
            create_provider(&config("template", None, None)).err(),
            Some(LlmError::NotConfigured(_))
        );
    }
}
