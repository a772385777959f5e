//! Tutor chat handler.
//!
//! `POST /api/ai/chat` takes `{ message, history }` and returns `{ text }`.
//! The history is forwarded as raw JSON and normalized by the tutor service.

use axum::extract::State;
use axum::Json;

use tutorly_types::chat::{ChatReply, ChatRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::JsonBody;
use crate::state::AppState;

pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(body): JsonBody<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    tracing::debug!(user_id = %auth.user_id, "tutor chat request");
    let reply = state
        .tutor_service
        .chat(&body.message, &body.history)
        .await?;
    Ok(Json(reply))
}
