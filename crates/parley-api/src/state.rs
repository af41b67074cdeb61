//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository and capability traits; AppState pins
//! them to the SQLite, argon2, and HS256 implementations.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::auth::service::AuthUserService;
use parley_core::chat::prompt::ChatPromptService;
use parley_core::chat::service::ChatMessageService;
use parley_core::service::chat_model::ChatModelService;
use parley_infra::config::resolve_database_url;
use parley_infra::crypto::password::Argon2PasswordScheme;
use parley_infra::crypto::token::{Hs256TokenCodec, generate_secret};
use parley_infra::sqlite::auth_user::SqliteAuthUserRepository;
use parley_infra::sqlite::chat_model::SqliteChatModelRepository;
use parley_infra::sqlite::message::SqliteChatMessageRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::prompt::SqliteChatPromptRepository;
use parley_infra::sqlite::session::SqliteChatSessionRepository;
use parley_types::config::ParleyConfig;
use secrecy::SecretString;

pub type ConcreteChatMessageService =
    ChatMessageService<SqliteChatMessageRepository, SqliteChatPromptRepository>;

pub type ConcreteChatPromptService = ChatPromptService<SqliteChatPromptRepository>;

pub type ConcreteAuthService =
    AuthUserService<SqliteAuthUserRepository, Argon2PasswordScheme, Hs256TokenCodec>;

pub type ConcreteChatModelService = ChatModelService<SqliteChatModelRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteChatMessageService>,
    pub prompt_service: Arc<ConcreteChatPromptService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub model_service: Arc<ConcreteChatModelService>,
    pub session_repo: Arc<SqliteChatSessionRepository>,
    pub config: Arc<ParleyConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Connect to the database and wire services.
    pub async fn init(config: ParleyConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = resolve_database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;
        tracing::debug!(url = %db_url, "Database ready");

        let secret = if config.jwt.secret.is_empty() {
            tracing::warn!(
                "No jwt secret configured (set PARLEY_JWT_SECRET); using an ephemeral one, sessions end on restart"
            );
            generate_secret()
        } else {
            SecretString::from(config.jwt.secret.clone())
        };
        let codec = Hs256TokenCodec::new(secret, &config.jwt.audience, config.jwt.lifetime_secs)?;

        let auth_service = AuthUserService::new(
            SqliteAuthUserRepository::new(db_pool.clone()),
            Argon2PasswordScheme::new(),
            codec,
            config.server.secure_cookies,
        );

        let message_service = ChatMessageService::new(
            SqliteChatMessageRepository::new(db_pool.clone()),
            SqliteChatPromptRepository::new(db_pool.clone()),
        );
        let prompt_service = ChatPromptService::new(SqliteChatPromptRepository::new(db_pool.clone()));
        let model_service = ChatModelService::new(SqliteChatModelRepository::new(db_pool.clone()));

        Ok(Self {
            message_service: Arc::new(message_service),
            prompt_service: Arc::new(prompt_service),
            auth_service: Arc::new(auth_service),
            model_service: Arc::new(model_service),
            session_repo: Arc::new(SqliteChatSessionRepository::new(db_pool)),
            config: Arc::new(config),
            data_dir,
        })
    }
}
