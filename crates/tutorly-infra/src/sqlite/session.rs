//! SQLite study session repository.
//!
//! Every lookup is keyed by both the session id and the owning user, so a
//! session belonging to someone else is simply not found.

use chrono::{DateTime, Utc};
use sqlx::Row;

use tutorly_core::repository::session::StudySessionRepository;
use tutorly_types::error::RepositoryError;
use tutorly_types::session::{StudySession, StudySessionId, UpdateSessionRequest};
use tutorly_types::user::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

const COLUMNS: &str = "id, user_id, title, video_url, thumbnail, content, created_at, updated_at";

/// SQLite-backed implementation of `StudySessionRepository`.
pub struct SqliteStudySessionRepository {
    pool: DatabasePool,
}

impl SqliteStudySessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        executor: &sqlx::SqlitePool,
        id: &StudySessionId,
        owner: &UserId,
    ) -> Result<Option<StudySession>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM study_sessions WHERE id = ? AND user_id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(executor)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }
}

struct SessionRow {
    id: String,
    user_id: String,
    title: String,
    video_url: String,
    thumbnail: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            video_url: row.try_get("video_url")?,
            thumbnail: row.try_get("thumbnail")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<StudySession, RepositoryError> {
        let id = self
            .id
            .parse::<StudySessionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        Ok(StudySession {
            id,
            user_id,
            title: self.title,
            video_url: self.video_url,
            thumbnail: self.thumbnail,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl StudySessionRepository for SqliteStudySessionRepository {
    async fn create(&self, session: &StudySession) -> Result<StudySession, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO study_sessions (id, user_id, title, video_url, thumbnail, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.title)
        .bind(&session.video_url)
        .bind(&session.thumbnail)
        .bind(&session.content)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(session.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("session '{}' already exists", session.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn list_for_user(&self, owner: &UserId) -> Result<Vec<StudySession>, RepositoryError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM study_sessions WHERE user_id = ? ORDER BY updated_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                SessionRow::from_row(row)
                    .map_err(query_error)?
                    .into_session()
            })
            .collect()
    }

    async fn get(
        &self,
        id: &StudySessionId,
        owner: &UserId,
    ) -> Result<Option<StudySession>, RepositoryError> {
        self.fetch(&self.pool.reader, id, owner).await
    }

    async fn update(
        &self,
        id: &StudySessionId,
        owner: &UserId,
        changes: &UpdateSessionRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<StudySession>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE study_sessions
             SET title = COALESCE(?, title),
                 content = COALESCE(?, content),
                 thumbnail = COALESCE(?, thumbnail),
                 updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.thumbnail.as_deref())
        .bind(format_datetime(&updated_at))
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        // Read back through the writer so the caller sees its own write.
        self.fetch(&self.pool.writer, id, owner).await
    }

    async fn delete(&self, id: &StudySessionId, owner: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM study_sessions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
