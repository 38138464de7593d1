//! Construction of the service graph from configuration.
//!
//! SQLite repositories are wrapped in the cache decorators, which share one
//! moka store with the export tier of the translation service.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::adapters::cache::{CacheAside, CachedTagRepository, CachedTranslationRepository, MokaCacheStore};
use crate::adapters::sqlite::{initialize_from_config, SqliteTagRepository, SqliteTranslationRepository};
use crate::domain::models::{CacheConfig, Config};
use crate::services::{TagService, TranslationService};

pub type TranslationStore = CachedTranslationRepository<SqliteTranslationRepository>;
pub type TagStore = CachedTagRepository<SqliteTagRepository>;
pub type AppTranslationService = TranslationService<TranslationStore, TagStore>;
pub type AppTagService = TagService<TagStore>;

pub struct AppServices {
    pub translations: AppTranslationService,
    pub tags: AppTagService,
    pub cache: Arc<MokaCacheStore>,
}

impl AppServices {
    /// Wire services over an already migrated pool.
    pub fn build(pool: SqlitePool, config: &CacheConfig) -> Self {
        let cache = Arc::new(MokaCacheStore::from_config(config));
        let entity_cache = CacheAside::new(cache.clone(), config.ttl());
        let export_cache = CacheAside::new(cache.clone(), config.export_ttl());

        let tags = Arc::new(CachedTagRepository::new(
            Arc::new(SqliteTagRepository::new(pool.clone())),
            entity_cache.clone(),
        ));
        let translations = Arc::new(CachedTranslationRepository::new(
            Arc::new(SqliteTranslationRepository::new(pool)),
            entity_cache,
        ));

        Self {
            translations: TranslationService::new(translations, tags.clone(), export_cache),
            tags: TagService::new(tags),
            cache,
        }
    }

    /// Open and migrate the configured database, then wire services over it.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = initialize_from_config(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;
        Ok(Self::build(pool, &config.cache))
    }
}
