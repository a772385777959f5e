//! Study session repository trait definition.

use tutorly_types::error::RepositoryError;
use tutorly_types::session::{StudySession, StudySessionId, UpdateSessionRequest};
use tutorly_types::user::UserId;

/// Repository trait for study session persistence.
///
/// Every lookup and write takes the owner's id and must match on it: a
/// session owned by someone else behaves exactly like a missing one.
pub trait StudySessionRepository: Send + Sync {
    /// Insert a new session. Returns the stored session.
    fn create(
        &self,
        session: &StudySession,
    ) -> impl std::future::Future<Output = Result<StudySession, RepositoryError>> + Send;

    /// All sessions owned by `owner`, most recently updated first.
    fn list_for_user(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<StudySession>, RepositoryError>> + Send;

    /// Get one session by id, if it exists and belongs to `owner`.
    fn get(
        &self,
        id: &StudySessionId,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<StudySession>, RepositoryError>> + Send;

    /// Apply the present fields of `changes` and set `updated_at`.
    ///
    /// Returns `None` when no owned session matched.
    fn update(
        &self,
        id: &StudySessionId,
        owner: &UserId,
        changes: &UpdateSessionRequest,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> impl std::future::Future<Output = Result<Option<StudySession>, RepositoryError>> + Send;

    /// Delete an owned session. Returns `false` when nothing matched.
    fn delete(
        &self,
        id: &StudySessionId,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
