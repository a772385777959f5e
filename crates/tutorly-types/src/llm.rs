//! LLM request/response types for Tutorly.
//!
//! Provider-agnostic shapes for a single tutor exchange: a seeded
//! conversation plus one new user turn in, one text completion out.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// One chat exchange sent to a generative provider.
///
/// `history` seeds the provider-side conversation and must already be
/// normalized (empty, or alternating starting with a user turn). `message`
/// is submitted verbatim as the next user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Text completion returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    /// Model that produced the reply, when the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

/// Token usage for one exchange, when reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Quota or rate limit hit. `message` is the provider's own text.
    #[error("rate limited: {message}")]
    RateLimited {
        retry_after_ms: Option<u64>,
        message: String,
    },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            message: "HTTP 500: boom".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500: boom");
        assert_eq!(
            LlmError::Blocked("SAFETY".to_string()).to_string(),
            "response blocked: SAFETY"
        );
        let limited = LlmError::RateLimited {
            retry_after_ms: Some(30_000),
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        };
        assert_eq!(
            limited.to_string(),
            "rate limited: Resource has been exhausted (e.g. check quota)."
        );
        assert_eq!(
            LlmError::AuthenticationFailed("API key not valid.".to_string()).to_string(),
            "authentication failed: API key not valid."
        );
    }

    #[test]
    fn test_completion_usage_defaults() {
        let completion: Completion = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(completion.text, "hi");
        assert!(completion.model.is_none());
        assert_eq!(completion.usage, Usage::default());
    }
}
