//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! `ChatService` is generic over its storage traits; AppState pins it to the
//! SQLite thread store and the local upload directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use mentionkit_core::action::bridge::ActionBridge;
use mentionkit_core::chat::service::ChatService;
use mentionkit_core::entity::registry::EntityRegistry;
use mentionkit_core::mention::pipeline::ContextPipeline;
use mentionkit_core::mention::scanner::MentionScanner;
use mentionkit_infra::config::load_global_config;
use mentionkit_infra::filesystem::{LocalUploadDir, resolve_data_dir, resolve_in_data_dir};
use mentionkit_infra::seed::load_registry;
use mentionkit_infra::sqlite::pool::{DatabasePool, database_url};
use mentionkit_infra::sqlite::thread::SqliteThreadStore;
use mentionkit_types::config::GlobalConfig;

/// Concrete type alias for the chat service pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteThreadStore, LocalUploadDir>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the resolved data directory and its `config.toml`.
    ///
    /// `seed_override` replaces the configured seed file.
    pub async fn init(seed_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;
        Self::open(&data_dir, config, seed_override).await
    }

    /// Wire services for an explicit data directory and configuration.
    pub async fn open(
        data_dir: &Path,
        config: GlobalConfig,
        seed_override: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&database_url(data_dir))
            .await
            .context("failed to open database")?;

        let seed_path =
            seed_override.unwrap_or_else(|| resolve_in_data_dir(data_dir, &config.seed_file));
        let registry = load_registry(&seed_path)
            .await
            .with_context(|| format!("failed to load entity seed {}", seed_path.display()))?;

        let scanner = MentionScanner::with_marker(config.mention_marker)
            .map_err(anyhow::Error::msg)
            .context("invalid mention_marker in config.toml")?;
        let pipeline = ContextPipeline::new(Arc::new(registry), scanner);

        let uploads = LocalUploadDir::new(resolve_in_data_dir(data_dir, &config.upload_dir));

        let chat_service = ChatService::new(
            SqliteThreadStore::new(db_pool),
            uploads,
            pipeline,
            ActionBridge::with_builtin_handlers(),
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        self.chat_service.pipeline().registry()
    }
}
