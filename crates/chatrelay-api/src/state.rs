//! Application state wiring the chat service to its infrastructure.
//!
//! `ChatService` is generic over repository and provider; AppState pins it
//! to SQLite and a boxed OpenAI-compatible provider.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use chatrelay_core::chat::service::ChatService;
use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_core::llm::reply::{ReplyGenerator, ReplySettings};
use chatrelay_infra::config::{load_api_key, load_relay_config, resolve_data_dir};
use chatrelay_infra::llm::create_provider;
use chatrelay_infra::sqlite::chat::SqliteChatRepository;
use chatrelay_infra::sqlite::pool::{DatabasePool, database_url};
use chatrelay_observe::genai_attrs::{
    GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MAX_TOKENS, GEN_AI_REQUEST_MODEL,
};
use chatrelay_types::config::RelayConfig;

pub type ConcreteChatService = ChatService<SqliteChatRepository, BoxLlmProvider>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, open the database,
    /// build the provider and wire the chat service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_relay_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let api_key = load_api_key(&config.provider);
        let provider = create_provider(&config.provider, api_key);

        Ok(Self::from_parts(data_dir, config, db_pool, provider))
    }

    /// Wire the state from already-constructed parts.
    pub fn from_parts(
        data_dir: PathBuf,
        config: RelayConfig,
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
    ) -> Self {
        info!(
            { GEN_AI_PROVIDER_NAME } = %config.provider.name,
            { GEN_AI_REQUEST_MODEL } = %config.provider.model,
            { GEN_AI_REQUEST_MAX_TOKENS } = config.provider.max_tokens,
            history_window = config.history_window,
            "Chat service configured"
        );

        let replies = ReplyGenerator::new(provider, ReplySettings::from(&config.provider));
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            replies,
            config.history_window,
        );

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
