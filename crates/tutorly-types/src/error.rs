use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to study session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Absent, or owned by another user. The two are deliberately
    /// indistinguishable to the caller.
    #[error("session not found")]
    NotFound,

    #[error("invalid session: {0}")]
    Invalid(String),

    #[error("no notes to download")]
    EmptyNotes,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to registration, login and token checks.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user already exists")]
    EmailTaken,

    #[error("invalid registration: {0}")]
    Invalid(String),

    #[error("token invalid or expired")]
    InvalidToken,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token expiry out of range")]
    ExpiryOutOfRange,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from the tutor chat proxy.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Credential missing or left at the placeholder value. Raised before
    /// any provider call.
    #[error("AI Key is not configured")]
    NotConfigured,

    #[error("{0}")]
    Provider(#[from] LlmError),
}

/// Errors from repository operations (used by trait definitions in tutorly-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::NotConfigured.to_string(), "AI Key is not configured");
        let err = ChatError::from(LlmError::Provider {
            message: "quota exceeded".to_string(),
        });
        assert_eq!(err.to_string(), "provider error: quota exceeded");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::EmailTaken.to_string(), "user already exists");
    }
}
