//! User and auth token repository trait definitions.

use tutorly_types::error::RepositoryError;
use tutorly_types::user::{AuthTokenRecord, User, UserId};

/// Repository trait for user accounts.
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A duplicate email yields `RepositoryError::Conflict`.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up by (already lowercased) email.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

/// Repository trait for issued bearer tokens (stored as digests).
pub trait TokenRepository: Send + Sync {
    fn insert(
        &self,
        record: &AuthTokenRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthTokenRecord>, RepositoryError>> + Send;

    /// Remove a token. Returns `false` when it was not present.
    fn revoke(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
