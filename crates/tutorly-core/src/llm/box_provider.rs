//! BoxChatProvider -- object-safe dynamic dispatch wrapper for ChatProvider.
//!
//! 1. Define an object-safe `ChatProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ChatProviderDyn` for all `T: ChatProvider`
//! 3. `BoxChatProvider` wraps `Box<dyn ChatProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use secrecy::SecretString;

use tutorly_types::llm::{Completion, ConversationRequest, LlmError};

use super::provider::ChatProvider;

/// Object-safe version of [`ChatProvider`] with boxed futures.
pub trait ChatProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_message_boxed<'a>(
        &'a self,
        api_key: &'a SecretString,
        request: &'a ConversationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, LlmError>> + Send + 'a>>;
}

impl<T: ChatProvider> ChatProviderDyn for T {
    fn name(&self) -> &str {
        ChatProvider::name(self)
    }

    fn send_message_boxed<'a>(
        &'a self,
        api_key: &'a SecretString,
        request: &'a ConversationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, LlmError>> + Send + 'a>> {
        Box::pin(self.send_message(api_key, request))
    }
}

/// Type-erased chat provider.
///
/// Lets the application state hold the real Gemini client in production and
/// a stub in router tests without making every handler generic.
pub struct BoxChatProvider {
    inner: Box<dyn ChatProviderDyn + Send + Sync>,
}

impl BoxChatProvider {
    /// Wrap a concrete `ChatProvider` in a type-erased box.
    pub fn new<T: ChatProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl ChatProvider for BoxChatProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn send_message(
        &self,
        api_key: &SecretString,
        request: &ConversationRequest,
    ) -> Result<Completion, LlmError> {
        self.inner.send_message_boxed(api_key, request).await
    }
}
