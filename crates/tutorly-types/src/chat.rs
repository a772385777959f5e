//! Tutor chat types.
//!
//! The client replays its whole transcript on every call, so none of these
//! types are persisted. `ChatRole` is the strict two-variant form the
//! generative API understands; the loose wire roles (`"user"`, `"ai"`, ...)
//! are coerced into it on parse.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Role of a turn in a tutor conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// A human turn.
    User,
    /// An assistant turn.
    Model,
}

impl ChatRole {
    /// Coerce a free-form wire role. Only the exact value `"user"` is a human
    /// turn; everything else (including `"ai"` and `"assistant"`) is `Model`.
    pub fn from_wire(role: Option<&str>) -> Self {
        match role {
            Some("user") => ChatRole::User,
            _ => ChatRole::Model,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Model => write!(f, "model"),
        }
    }
}

/// A single turn of a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Body of `POST /api/ai/chat`.
///
/// `history` is kept as raw JSON: the client is not trusted to send a
/// well-formed array, and malformed input must degrade rather than reject.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: serde_json::Value,
}

/// Successful tutor reply, relayed verbatim from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}
