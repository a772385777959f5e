//! Application error type mapping domain failures to HTTP responses.
//!
//! Every error body has the shape `{ "message": ..., "code": ... }`, plus a
//! `detail` field for tutor provider failures. JSON body rejections come
//! through here too.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tutorly_types::error::{AuthError, ChatError, SessionError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session failure. `failure` is the fixed message shown when storage
    /// breaks, so the client never sees database details.
    Session {
        error: SessionError,
        failure: &'static str,
    },
    Auth(AuthError),
    Chat(ChatError),
    /// Missing or unusable bearer token.
    Unauthorized(String),
    /// Request body that is not valid JSON for the endpoint.
    InvalidBody { status: StatusCode, message: String },
}

impl AppError {
    pub fn session(failure: &'static str) -> impl FnOnce(SessionError) -> AppError {
        move |error| AppError::Session { error, failure }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    detail: Option<String>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }
}

impl AppError {
    fn body(&self) -> ErrorBody {
        match self {
            AppError::Session { error, failure } => match error {
                SessionError::NotFound => {
                    ErrorBody::new(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found")
                }
                SessionError::Invalid(msg) => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                SessionError::EmptyNotes => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "EMPTY_NOTES", "No notes to download")
                }
                SessionError::StorageError(_) => {
                    ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", *failure)
                }
            },
            AppError::Auth(error) => match error {
                AuthError::InvalidCredentials => ErrorBody::new(
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password",
                ),
                AuthError::EmailTaken => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "USER_EXISTS", "User already exists")
                }
                AuthError::Invalid(msg) => {
                    ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AuthError::InvalidToken => ErrorBody::new(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Not authorized, token failed",
                ),
                AuthError::Hashing(_)
                | AuthError::ExpiryOutOfRange
                | AuthError::StorageError(_) => ErrorBody::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_ERROR",
                    "Authentication failed",
                ),
            },
            AppError::Chat(ChatError::NotConfigured) => ErrorBody::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI_NOT_CONFIGURED",
                "AI Key is not configured",
            ),
            AppError::Chat(ChatError::Provider(e)) => ErrorBody {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "AI_ERROR",
                message: format!("AI Error: {e}"),
                detail: Some(format!("{e:?}")),
            },
            AppError::Unauthorized(msg) => {
                ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::InvalidBody { status, message } => {
                ErrorBody::new(*status, "INVALID_BODY", message.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.body();

        if body.status.is_server_error() {
            tracing::error!(code = body.code, error = ?self, "request failed");
        }

        let mut json = json!({
            "message": body.message,
            "code": body.code,
        });
        if let Some(detail) = body.detail {
            json["detail"] = serde_json::Value::String(detail);
        }

        (body.status, Json(json)).into_response()
    }
}
