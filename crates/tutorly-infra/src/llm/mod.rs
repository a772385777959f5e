//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`ChatProvider`] port defined
//! in `tutorly-core`, plus a factory that builds it from settings.
//!
//! [`ChatProvider`]: tutorly_core::llm::provider::ChatProvider

pub mod gemini;

use std::time::Duration;

use tutorly_core::llm::box_provider::BoxChatProvider;
use tutorly_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Settings for the tutor's provider. The API key is not part of this; it is
/// handed to the provider per call.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: gemini::client::DEFAULT_MODEL.to_string(),
            base_url: gemini::client::DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Build the boxed provider used by the tutor service.
pub fn create_provider(settings: &ProviderSettings) -> Result<BoxChatProvider, LlmError> {
    let provider = GeminiProvider::new(settings.model.clone(), settings.timeout)?
        .with_base_url(settings.base_url.clone());
    tracing::info!(model = %provider.model(), "configured gemini provider");
    Ok(BoxChatProvider::new(provider))
}
