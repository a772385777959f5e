//! Study session handlers. Every route is owner-scoped through [`AuthUser`].
//!
//! Endpoints:
//! - POST   /api/sessions             - Create a session
//! - GET    /api/sessions             - List the caller's sessions
//! - GET    /api/sessions/{id}        - Get one session
//! - PUT    /api/sessions/{id}        - Partial update
//! - DELETE /api/sessions/{id}        - Delete
//! - GET    /api/sessions/{id}/export - Download notes as HTML

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use tutorly_types::error::SessionError;
use tutorly_types::session::{
    CreateSessionRequest, StudySession, StudySessionId, UpdateSessionRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::JsonBody;
use crate::state::AppState;

/// A malformed id cannot name anything the caller owns.
fn parse_id(raw: &str, failure: &'static str) -> Result<StudySessionId, AppError> {
    raw.parse()
        .map_err(|_| AppError::session(failure)(SessionError::NotFound))
}

pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(body): JsonBody<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), AppError> {
    let session = state
        .session_service
        .create(&auth.user_id, body)
        .await
        .map_err(AppError::session("Failed to create session"))?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<StudySession>>, AppError> {
    let sessions = state
        .session_service
        .list(&auth.user_id)
        .await
        .map_err(AppError::session("Failed to fetch sessions"))?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudySession>, AppError> {
    const FAILURE: &str = "Failed to fetch session";
    let id = parse_id(&id, FAILURE)?;
    let session = state
        .session_service
        .get(&auth.user_id, &id)
        .await
        .map_err(AppError::session(FAILURE))?;
    Ok(Json(session))
}

pub async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateSessionRequest>,
) -> Result<Json<StudySession>, AppError> {
    const FAILURE: &str = "Failed to update session";
    let id = parse_id(&id, FAILURE)?;
    let session = state
        .session_service
        .update(&auth.user_id, &id, body)
        .await
        .map_err(AppError::session(FAILURE))?;
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    const FAILURE: &str = "Failed to delete session";
    let id = parse_id(&id, FAILURE)?;
    state
        .session_service
        .delete(&auth.user_id, &id)
        .await
        .map_err(AppError::session(FAILURE))?;
    Ok(Json(json!({ "message": "Session deleted" })))
}

pub async fn export_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    const FAILURE: &str = "Failed to fetch session";
    let id = parse_id(&id, FAILURE)?;
    let export = state
        .session_service
        .export_notes(&auth.user_id, &id)
        .await
        .map_err(AppError::session(FAILURE))?;

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        export.html,
    )
        .into_response())
}
