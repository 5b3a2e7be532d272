//! Application state wiring all services together.
//!
//! Services are generic over repository and hasher traits; AppState pins them
//! to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use prompt_builder_core::service::analysis::AnalysisService;
use prompt_builder_core::service::share::SharePromptService;
use prompt_builder_core::store::repository::PromptStoreRepository;
use prompt_builder_infra::crypto::hash::Sha256ContentHasher;
use prompt_builder_infra::filesystem::store_dir;
use prompt_builder_infra::sqlite::analysis::SqliteAnalysisRepository;
use prompt_builder_infra::sqlite::pool::DatabasePool;
use prompt_builder_infra::sqlite::shared_prompt::SqliteSharedPromptRepository;
use prompt_builder_infra::storage::file::FileStorageBackend;
use prompt_builder_types::config::BuilderConfig;

use crate::cli::analyze::HeuristicAnalyzer;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteShareService = SharePromptService<SqliteSharedPromptRepository, Sha256ContentHasher>;

pub type ConcreteAnalysisService =
    AnalysisService<SqliteAnalysisRepository, HeuristicAnalyzer, Sha256ContentHasher>;

pub type ConcretePromptStore = PromptStoreRepository<FileStorageBackend>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub share_service: Arc<ConcreteShareService>,
    pub analysis_service: Arc<ConcreteAnalysisService>,
    pub prompt_store: Arc<ConcretePromptStore>,
    pub hasher: Sha256ContentHasher,
    pub config: BuilderConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: open the database, wire services.
    pub async fn init(data_dir: PathBuf, config: BuilderConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::open(&data_dir).await?;

        let share_service = SharePromptService::new(
            SqliteSharedPromptRepository::new(db_pool.clone()),
            Sha256ContentHasher::new(),
        );
        let analysis_service = AnalysisService::new(
            SqliteAnalysisRepository::new(db_pool),
            HeuristicAnalyzer,
            Sha256ContentHasher::new(),
        );
        let prompt_store = PromptStoreRepository::with_settings(
            FileStorageBackend::new(store_dir(&data_dir)),
            config.store.clone(),
        );

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            share_service: Arc::new(share_service),
            analysis_service: Arc::new(analysis_service),
            prompt_store: Arc::new(prompt_store),
            hasher: Sha256ContentHasher::new(),
            config,
            data_dir,
        })
    }
}
