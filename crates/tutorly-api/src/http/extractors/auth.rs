//! Bearer token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to the owning user
//! through the auth service. Handlers that take an [`AuthUser`] are
//! protected; the rest are public.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use tutorly_types::error::AuthError;
use tutorly_types::user::UserId;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    /// The presented token, kept so logout can revoke it.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        match state.auth_service.authenticate(&token).await {
            Ok(user_id) => Ok(AuthUser { user_id, token }),
            Err(AuthError::InvalidToken) => Err(AppError::Unauthorized(
                "Not authorized, token failed".to_string(),
            )),
            Err(e) => Err(AppError::Auth(e)),
        }
    }
}

fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Err(AppError::Unauthorized("Not authorized, no token".to_string()));
    };

    let value = header.to_str().map_err(|_| {
        AppError::Unauthorized("Not authorized, invalid Authorization header".to_string())
    })?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized("Not authorized, no token".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(
            extract_bearer(&parts_with(Some("Bearer tutorly_abc"))).unwrap(),
            "tutorly_abc"
        );
        assert!(extract_bearer(&parts_with(None)).is_err());
        assert!(extract_bearer(&parts_with(Some("Basic Zm9vOmJhcg=="))).is_err());
        assert!(extract_bearer(&parts_with(Some("Bearer   "))).is_err());
    }
}
