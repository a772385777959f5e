//! Application state wiring all services together.
//!
//! Services are generic over the core ports; AppState pins them to the
//! concrete infra implementations.

use std::sync::Arc;

use secrecy::SecretString;

use tutorly_core::chat::service::TutorService;
use tutorly_core::llm::box_provider::BoxChatProvider;
use tutorly_core::service::auth::AuthService;
use tutorly_core::service::session::SessionService;
use tutorly_infra::crypto::password::Argon2PasswordHasher;
use tutorly_infra::crypto::token::Sha256TokenIssuer;
use tutorly_infra::llm::create_provider;
use tutorly_infra::sqlite::pool::DatabasePool;
use tutorly_infra::sqlite::session::SqliteStudySessionRepository;
use tutorly_infra::sqlite::user::{SqliteTokenRepository, SqliteUserRepository};

use crate::cli::ServeArgs;

pub type ConcreteSessionService = SessionService<SqliteStudySessionRepository>;

pub type ConcreteAuthService = AuthService<
    SqliteUserRepository,
    SqliteTokenRepository,
    Argon2PasswordHasher,
    Sha256TokenIssuer,
>;

pub type ConcreteTutorService = TutorService<BoxChatProvider>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub tutor_service: Arc<ConcreteTutorService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the database and wire services from the server settings.
    pub async fn init(args: &ServeArgs) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&args.database.resolve()).await?;

        let purged = SqliteTokenRepository::new(db_pool.clone())
            .purge_expired(chrono::Utc::now())
            .await?;
        if purged > 0 {
            tracing::info!(purged, "removed expired auth tokens");
        }

        let provider = create_provider(&args.provider_settings())?;
        let state = Self::from_parts(db_pool, provider, args.api_key(), args.token_ttl_hours);

        if !state.tutor_service.is_configured() {
            tracing::warn!("GEMINI_API_KEY is not configured; tutor chat requests will fail");
        }
        Ok(state)
    }

    /// Wire services over an open pool and an already-built provider.
    pub fn from_parts(
        db_pool: DatabasePool,
        provider: BoxChatProvider,
        api_key: Option<SecretString>,
        token_ttl_hours: i64,
    ) -> Self {
        let session_service =
            SessionService::new(SqliteStudySessionRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteTokenRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Sha256TokenIssuer::new(),
            token_ttl_hours,
        );

        let tutor_service = TutorService::new(provider, api_key);

        Self {
            session_service: Arc::new(session_service),
            auth_service: Arc::new(auth_service),
            tutor_service: Arc::new(tutor_service),
            db_pool,
        }
    }
}
