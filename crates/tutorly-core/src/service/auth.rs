//! Account registration, login and bearer token resolution.
//!
//! Tokens are opaque random strings. Only their digest is stored, with an
//! expiry; resolving a token means digesting it and looking the digest up.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use tutorly_types::error::{AuthError, RepositoryError};
use tutorly_types::user::{
    AuthResponse, AuthTokenRecord, LoginRequest, RegisterRequest, User, UserId, UserProfile,
};

use crate::repository::user::{TokenRepository, UserRepository};
use crate::service::credential::{PasswordHasher, TokenIssuer};

/// Default token lifetime: 30 days.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 30;

/// Longest accepted token lifetime: 10 years. Larger values are clamped.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

pub struct AuthService<U: UserRepository, T: TokenRepository, H: PasswordHasher, I: TokenIssuer> {
    users: U,
    tokens: T,
    hasher: H,
    issuer: I,
    token_ttl: Duration,
}

impl<U: UserRepository, T: TokenRepository, H: PasswordHasher, I: TokenIssuer>
    AuthService<U, T, H, I>
{
    pub fn new(users: U, tokens: T, hasher: H, issuer: I, token_ttl_hours: i64) -> Self {
        Self {
            users,
            tokens,
            hasher,
            issuer,
            token_ttl: Duration::hours(token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let name = request.name.trim().to_string();
        let email = normalize_email(&request.email);
        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AuthError::Invalid(
                "name, email and password are required".to_string(),
            ));
        }

        if self
            .users
            .get_by_email(&email)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self
            .hasher
            .hash_password(&request.password)
            .map_err(AuthError::Hashing)?;

        let user = User {
            id: UserId::new(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        // A concurrent registration can still win the race; the unique index
        // reports it as a conflict.
        let user = self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => storage(other),
        })?;

        info!(user_id = %user.id, "user registered");
        self.sign_in(&user).await
    }

    /// Check credentials and issue a fresh token.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        let user = self
            .users
            .get_by_email(&email)
            .await
            .map_err(storage)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)
        {
            warn!(user_id = %user.id, "login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }

        self.sign_in(&user).await
    }

    /// Resolve a presented bearer token to its user id.
    pub async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let digest = self.issuer.digest_token(token);
        let record = self
            .tokens
            .find_by_hash(&digest)
            .await
            .map_err(storage)?
            .ok_or(AuthError::InvalidToken)?;

        if record.is_expired(Utc::now()) {
            return Err(AuthError::InvalidToken);
        }
        Ok(record.user_id)
    }

    /// Revoke a token (logout). Unknown tokens are not an error.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let digest = self.issuer.digest_token(token.trim());
        self.tokens.revoke(&digest).await.map_err(storage)?;
        Ok(())
    }

    pub async fn profile(&self, id: &UserId) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(AuthError::InvalidToken)?;
        Ok(UserProfile::from(&user))
    }

    async fn sign_in(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.issuer.generate_token();
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.token_ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let record = AuthTokenRecord {
            id: Uuid::now_v7(),
            user_id: user.id,
            token_hash: self.issuer.digest_token(&token),
            created_at: now,
            expires_at,
        };
        self.tokens.insert(&record).await.map_err(storage)?;

        Ok(AuthResponse {
            token,
            user: UserProfile::from(user),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn storage(e: RepositoryError) -> AuthError {
    AuthError::StorageError(e.to_string())
}
