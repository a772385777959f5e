use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Unique identifier for a study session, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudySessionId(pub Uuid);

impl StudySessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for StudySessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StudySessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudySessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A study session: one YouTube video paired with the owner's notes.
///
/// Serialized in camelCase because that is what the web client sends back
/// on create (`videoUrl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: StudySessionId,
    /// Owning user. Every read and write is scoped by this.
    pub user_id: UserId,
    pub title: String,
    pub video_url: String,
    pub thumbnail: String,
    /// Rich-text notes (HTML produced by the editor).
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub title: String,
    pub video_url: String,
    pub thumbnail: String,
    pub content: String,
}

/// Body of `PUT /api/sessions/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serializes_camel_case() {
        let now = Utc::now();
        let session = StudySession {
            id: StudySessionId::new(),
            user_id: UserId::new(),
            title: "Rust ownership".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail: String::new(),
            content: "<p>notes</p>".to_string(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["videoUrl"], "https://youtu.be/dQw4w9WgXcQ");
        assert!(value.get("userId").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["id"], session.id.to_string());
    }

    #[test]
    fn test_update_request_partial() {
        let req: UpdateSessionRequest = serde_json::from_str(r#"{"content":"<p>x</p>"}"#).unwrap();
        assert!(req.title.is_none());
        assert_eq!(req.content.as_deref(), Some("<p>x</p>"));
    }

    #[test]
    fn test_session_id_roundtrip_display() {
        let id = StudySessionId::new();
        let parsed: StudySessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<StudySessionId>().is_err());
    }
}
