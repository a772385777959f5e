//! SQLite user and auth token repositories.

use sqlx::Row;
use uuid::Uuid;

use tutorly_core::repository::user::{TokenRepository, UserRepository};
use tutorly_types::error::RepositoryError;
use tutorly_types::user::{AuthTokenRecord, User, UserId};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = self
            .id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        Ok(User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SqliteUserRepository {
    async fn fetch_one_where(
        &self,
        column: &str,
        value: String,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE {column} = ?"
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let user_row = UserRow::from_row(&row).map_err(query_error)?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' already registered", user.email)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("id", id.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("email", email.to_string()).await
    }
}

/// SQLite-backed implementation of `TokenRepository`.
pub struct SqliteTokenRepository {
    pool: DatabasePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Remove every expired token. Returns how many rows went away.
    pub async fn purge_expired(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}

impl TokenRepository for SqliteTokenRepository {
    async fn insert(&self, record: &AuthTokenRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO auth_tokens (id, user_id, token_hash, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.token_hash)
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<AuthTokenRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, token_hash, created_at, expires_at FROM auth_tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.try_get("id").map_err(query_error)?;
        let user_id: String = row.try_get("user_id").map_err(query_error)?;
        let created_at: String = row.try_get("created_at").map_err(query_error)?;
        let expires_at: String = row.try_get("expires_at").map_err(query_error)?;

        Ok(Some(AuthTokenRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| RepositoryError::Query(format!("invalid token id: {e}")))?,
            user_id: user_id
                .parse()
                .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?,
            token_hash: row.try_get("token_hash").map_err(query_error)?,
            created_at: parse_datetime(&created_at)?,
            expires_at: parse_datetime(&expires_at)?,
        }))
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_support::temp_pool;
    use chrono::{Duration, Utc};

    fn make_user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: "Grace".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteUserRepository::new(pool);
        let user = make_user("grace@example.com");
        repo.create(&user).await.unwrap();

        let by_email = repo.get_by_email("grace@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash, user.password_hash);

        let by_id = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "grace@example.com");

        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteUserRepository::new(pool);
        repo.create(&make_user("grace@example.com")).await.unwrap();

        let err = repo.create(&make_user("grace@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let (pool, _dir) = temp_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let tokens = SqliteTokenRepository::new(pool);
        let user = make_user("grace@example.com");
        users.create(&user).await.unwrap();

        let now = Utc::now();
        let record = AuthTokenRecord {
            id: Uuid::now_v7(),
            user_id: user.id,
            token_hash: "abc123".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        tokens.insert(&record).await.unwrap();

        let found = tokens.find_by_hash("abc123").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert!(!found.is_expired(now));

        assert!(tokens.revoke("abc123").await.unwrap());
        assert!(!tokens.revoke("abc123").await.unwrap());
        assert!(tokens.find_by_hash("abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_requires_existing_user() {
        let (pool, _dir) = temp_pool().await;
        let tokens = SqliteTokenRepository::new(pool);
        let now = Utc::now();
        let record = AuthTokenRecord {
            id: Uuid::now_v7(),
            user_id: UserId::new(),
            token_hash: "orphan".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        assert!(tokens.insert(&record).await.is_err());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (pool, _dir) = temp_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let tokens = SqliteTokenRepository::new(pool);
        let user = make_user("grace@example.com");
        users.create(&user).await.unwrap();

        let now = Utc::now();
        for (hash, offset) in [("old", -2), ("fresh", 2)] {
            tokens
                .insert(&AuthTokenRecord {
                    id: Uuid::now_v7(),
                    user_id: user.id,
                    token_hash: hash.to_string(),
                    created_at: now,
                    expires_at: now + Duration::hours(offset),
                })
                .await
                .unwrap();
        }

        assert_eq!(tokens.purge_expired(now).await.unwrap(), 1);
        assert!(tokens.find_by_hash("old").await.unwrap().is_none());
        assert!(tokens.find_by_hash("fresh").await.unwrap().is_some());
    }
}
