//! Account handlers.
//!
//! Endpoints:
//! - POST /api/auth/register - Create an account, returns a token
//! - POST /api/auth/login    - Exchange credentials for a token
//! - POST /api/auth/logout   - Revoke the presented token
//! - GET  /api/auth/me       - The caller's profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use tutorly_types::user::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::JsonBody;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.auth_service.register(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth_service.login(body).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    state.auth_service.revoke(&auth.token).await?;
    tracing::info!(user_id = %auth.user_id, "user logged out");
    Ok(Json(json!({ "message": "Logged out" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.auth_service.profile(&auth.user_id).await?))
}
