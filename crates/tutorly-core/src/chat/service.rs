//! Tutor service: the chat proxy between the web client and the provider.
//!
//! One call = one exchange. Nothing is stored; the client sends the full
//! transcript each time and gets back only the new reply.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error};

use tutorly_types::chat::ChatReply;
use tutorly_types::error::ChatError;
use tutorly_types::llm::ConversationRequest;

use crate::chat::normalizer::normalize_history;
use crate::llm::provider::ChatProvider;

/// Value shipped in the sample `.env`; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// True when `key` is absent, blank or still the sample placeholder.
pub fn is_unconfigured_key(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        None | Some("") => true,
        Some(k) => k == PLACEHOLDER_API_KEY,
    }
}

/// Bridges a tutor chat turn to a [`ChatProvider`].
pub struct TutorService<P: ChatProvider> {
    provider: P,
    api_key: Option<SecretString>,
}

impl<P: ChatProvider> TutorService<P> {
    /// Create a tutor service.
    ///
    /// A missing or placeholder key is accepted here and only reported when
    /// a chat is attempted, so the server still starts without one.
    pub fn new(provider: P, api_key: Option<SecretString>) -> Self {
        Self { provider, api_key }
    }

    /// Whether a usable credential is present.
    pub fn is_configured(&self) -> bool {
        !is_unconfigured_key(self.api_key.as_ref().map(|k| k.expose_secret()))
    }

    /// Run one exchange: normalize `raw_history`, seed the provider with it,
    /// submit `message` verbatim, return the completion text untouched.
    ///
    /// Provider failures are returned, never retried.
    pub async fn chat(&self, message: &str, raw_history: &Value) -> Result<ChatReply, ChatError> {
        let api_key = match &self.api_key {
            Some(key) if self.is_configured() => key,
            _ => return Err(ChatError::NotConfigured),
        };

        let history = normalize_history(raw_history);
        debug!(
            provider = self.provider.name(),
            raw_turns = raw_history.as_array().map_or(0, Vec::len),
            kept_turns = history.len(),
            "normalized chat history"
        );

        let request = ConversationRequest {
            history,
            message: message.to_string(),
        };

        match self.provider.send_message(api_key, &request).await {
            Ok(completion) => Ok(ChatReply {
                text: completion.text,
            }),
            Err(e) => {
                error!(provider = self.provider.name(), error = ?e, "tutor provider call failed");
                Err(ChatError::Provider(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;
    use tutorly_types::chat::ChatMessage;
    use tutorly_types::llm::{Completion, LlmError, Usage};

    /// Records every request and replies with a canned result.
    struct RecordingProvider {
        seen: Mutex<Vec<ConversationRequest>>,
        fail_with: Option<String>,
    }

    impl RecordingProvider {
        fn ok() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }
    }

    impl ChatProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn send_message(
            &self,
            _api_key: &SecretString,
            request: &ConversationRequest,
        ) -> impl Future<Output = Result<Completion, LlmError>> + Send {
            self.seen.lock().unwrap().push(request.clone());
            let result = match &self.fail_with {
                Some(msg) => Err(LlmError::Provider {
                    message: msg.clone(),
                }),
                None => Ok(Completion {
                    text: format!("echo: {}", request.message),
                    model: Some("stub".to_string()),
                    usage: Usage::default(),
                }),
            };
            async move { result }
        }
    }

    /// Fails the test if the service ever reaches the provider.
    struct UnreachableProvider;

    impl ChatProvider for UnreachableProvider {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn send_message(
            &self,
            _api_key: &SecretString,
            _request: &ConversationRequest,
        ) -> Result<Completion, LlmError> {
            panic!("provider must not be called without a configured key")
        }
    }

    fn key(value: &str) -> Option<SecretString> {
        Some(SecretString::from(value.to_string()))
    }

    #[test]
    fn test_is_unconfigured_key() {
        assert!(is_unconfigured_key(None));
        assert!(is_unconfigured_key(Some("")));
        assert!(is_unconfigured_key(Some("   ")));
        assert!(is_unconfigured_key(Some(PLACEHOLDER_API_KEY)));
        assert!(!is_unconfigured_key(Some("AIza-real-key")));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_provider() {
        let service = TutorService::new(UnreachableProvider, None);
        let err = service.chat("hello", &json!([])).await.unwrap_err();
        assert!(matches!(err, ChatError::NotConfigured));
        assert_eq!(err.to_string(), "AI Key is not configured");
    }

    #[tokio::test]
    async fn test_placeholder_key_never_calls_provider() {
        let service = TutorService::new(UnreachableProvider, key(PLACEHOLDER_API_KEY));
        assert!(!service.is_configured());
        let err = service.chat("hello", &Value::Null).await.unwrap_err();
        assert!(matches!(err, ChatError::NotConfigured));
    }

    #[tokio::test]
    async fn test_empty_history_seeds_empty_conversation() {
        let service = TutorService::new(RecordingProvider::ok(), key("k"));
        let reply = service.chat("What is a lifetime?", &json!([])).await.unwrap();
        assert_eq!(reply.text, "echo: What is a lifetime?");

        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].history.is_empty());
        assert_eq!(seen[0].message, "What is a lifetime?");
    }

    #[tokio::test]
    async fn test_history_is_normalized_before_sending() {
        let service = TutorService::new(RecordingProvider::ok(), key("k"));
        let raw = json!([
            {"role": "model", "text": "hi"},
            {"role": "user", "text": "a"},
            {"role": "user", "text": "b"},
            {"role": "model", "text": "c"},
        ]);
        service.chat("next", &raw).await.unwrap();

        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(
            seen[0].history,
            vec![ChatMessage::user("a"), ChatMessage::model("c")]
        );
    }

    #[tokio::test]
    async fn test_message_passed_verbatim() {
        let service = TutorService::new(RecordingProvider::ok(), key("k"));
        let message = "  spaced\n<b>markup</b>  ";
        service.chat(message, &Value::Null).await.unwrap();
        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(seen[0].message, message);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_message() {
        let service = TutorService::new(RecordingProvider::failing("quota exceeded"), key("k"));
        let err = service.chat("hello", &json!([])).await.unwrap_err();
        match err {
            ChatError::Provider(inner) => assert!(inner.to_string().contains("quota exceeded")),
            other => panic!("expected provider error, got {other:?}"),
        }
        // Exactly one attempt, no retry.
        assert_eq!(service.provider.seen.lock().unwrap().len(), 1);
    }
}
