//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/validator traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use botgate_core::query::QueryFilterEngine;
use botgate_core::service::bot::BotService;
use botgate_infra::config::{load_global_config, resolve_data_dir, storage_timeout};
use botgate_infra::credential::http::HttpTokenValidator;
use botgate_infra::sqlite::api_key::SqliteApiKeyStore;
use botgate_infra::sqlite::bot::SqliteBotRepository;
use botgate_infra::sqlite::permission::SqliteCapabilityStore;
use botgate_infra::sqlite::pool::{DatabasePool, database_url};
use botgate_types::config::GlobalConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteBotService =
    BotService<SqliteBotRepository, SqliteCapabilityStore, HttpTokenValidator>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot_service: Arc<ConcreteBotService>,
    /// Grant management for the CLI; the bot service holds its own store.
    pub capabilities: Arc<SqliteCapabilityStore>,
    pub api_keys: Arc<SqliteApiKeyStore>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve the data dir, load config,
    /// connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        Self::with_config(data_dir, config).await
    }

    /// Wire services for an existing data directory and configuration.
    pub async fn with_config(data_dir: PathBuf, config: GlobalConfig) -> anyhow::Result<Self> {
        let db_url = database_url(&data_dir, &config.storage.database_file);
        let db_pool = DatabasePool::new(&db_url).await?;
        let timeout = storage_timeout(&config);

        let bot_repo = SqliteBotRepository::new(db_pool.clone()).with_timeout(timeout);
        let tokens = HttpTokenValidator::new(&config.confirmation)?;

        let bot_service = BotService::new(
            bot_repo,
            SqliteCapabilityStore::new(db_pool.clone()).with_timeout(timeout),
            tokens,
            QueryFilterEngine::new(&config.listing),
        )
        .with_concealed_foreign_bots(config.access.conceal_foreign_bots);

        Ok(Self {
            bot_service: Arc::new(bot_service),
            capabilities: Arc::new(
                SqliteCapabilityStore::new(db_pool.clone()).with_timeout(timeout),
            ),
            api_keys: Arc::new(SqliteApiKeyStore::new(db_pool.clone()).with_timeout(timeout)),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
