//! Study session service.
//!
//! Owner-scoped CRUD over [`StudySessionRepository`] plus the HTML notes
//! export. Not-found and storage failures stay distinct variants of
//! [`SessionError`] so the HTTP layer can tell them apart.

use chrono::Utc;
use tracing::{error, info};

use tutorly_types::error::{RepositoryError, SessionError};
use tutorly_types::session::{
    CreateSessionRequest, StudySession, StudySessionId, UpdateSessionRequest,
};
use tutorly_types::user::UserId;

use crate::repository::session::StudySessionRepository;
use crate::study::{export, youtube};

/// Title used when the client leaves it blank.
pub const DEFAULT_SESSION_TITLE: &str = "New Study Session";

/// A rendered notes export, ready to be served as a download.
#[derive(Debug, Clone)]
pub struct NotesExport {
    pub filename: String,
    pub html: String,
}

pub struct SessionService<R: StudySessionRepository> {
    repo: R,
}

impl<R: StudySessionRepository> SessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a session owned by `owner`.
    ///
    /// A blank title becomes [`DEFAULT_SESSION_TITLE`]; a blank thumbnail is
    /// derived from the video id when the URL is a recognizable YouTube link.
    pub async fn create(
        &self,
        owner: &UserId,
        request: CreateSessionRequest,
    ) -> Result<StudySession, SessionError> {
        let video_url = request.video_url.trim().to_string();
        if video_url.is_empty() {
            return Err(SessionError::Invalid("videoUrl is required".to_string()));
        }

        let title = match request.title.trim() {
            "" => DEFAULT_SESSION_TITLE.to_string(),
            t => t.to_string(),
        };

        let thumbnail = if request.thumbnail.trim().is_empty() {
            youtube::extract_video_id(&video_url)
                .map(|id| youtube::thumbnail_url(&id))
                .unwrap_or_default()
        } else {
            request.thumbnail
        };

        let now = Utc::now();
        let session = StudySession {
            id: StudySessionId::new(),
            user_id: *owner,
            title,
            video_url,
            thumbnail,
            content: request.content,
            created_at: now,
            updated_at: now,
        };

        let session = self
            .repo
            .create(&session)
            .await
            .map_err(|e| storage_error("create", e))?;

        info!(session_id = %session.id, user_id = %owner, "study session created");
        Ok(session)
    }

    /// The caller's sessions, most recently updated first.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<StudySession>, SessionError> {
        self.repo
            .list_for_user(owner)
            .await
            .map_err(|e| storage_error("list", e))
    }

    pub async fn get(
        &self,
        owner: &UserId,
        id: &StudySessionId,
    ) -> Result<StudySession, SessionError> {
        self.repo
            .get(id, owner)
            .await
            .map_err(|e| storage_error("get", e))?
            .ok_or(SessionError::NotFound)
    }

    /// Apply a partial update (title, content, thumbnail).
    pub async fn update(
        &self,
        owner: &UserId,
        id: &StudySessionId,
        changes: UpdateSessionRequest,
    ) -> Result<StudySession, SessionError> {
        let updated = self
            .repo
            .update(id, owner, &changes, Utc::now())
            .await
            .map_err(|e| storage_error("update", e))?
            .ok_or(SessionError::NotFound)?;

        info!(session_id = %id, user_id = %owner, "study session updated");
        Ok(updated)
    }

    pub async fn delete(&self, owner: &UserId, id: &StudySessionId) -> Result<(), SessionError> {
        let deleted = self
            .repo
            .delete(id, owner)
            .await
            .map_err(|e| storage_error("delete", e))?;

        if !deleted {
            return Err(SessionError::NotFound);
        }
        info!(session_id = %id, user_id = %owner, "study session deleted");
        Ok(())
    }

    /// Render the session's notes as a downloadable HTML page.
    pub async fn export_notes(
        &self,
        owner: &UserId,
        id: &StudySessionId,
    ) -> Result<NotesExport, SessionError> {
        let session = self.get(owner, id).await?;
        if session.content.trim().is_empty() {
            return Err(SessionError::EmptyNotes);
        }

        Ok(NotesExport {
            filename: export::export_filename(&session.title),
            html: export::render_notes_html(&session.title, &session.content, Utc::now()),
        })
    }
}

fn storage_error(op: &str, e: RepositoryError) -> SessionError {
    error!(operation = op, error = %e, "study session storage failure");
    SessionError::StorageError(e.to_string())
}
