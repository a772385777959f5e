//! ChatProvider trait definition.
//!
//! The abstraction over a hosted chat-completion service: open a
//! conversation seeded with history, submit one user turn, await the text.

use secrecy::SecretString;

use tutorly_types::llm::{Completion, ConversationRequest, LlmError};

/// Trait for generative chat backends (Gemini, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// The credential is passed per call: it is resolved and validated by the
/// caller, and providers never store it.
///
/// Implementations live in tutorly-infra (e.g., `GeminiProvider`).
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send one exchange and receive the full completion.
    fn send_message(
        &self,
        api_key: &SecretString,
        request: &ConversationRequest,
    ) -> impl std::future::Future<Output = Result<Completion, LlmError>> + Send;
}
