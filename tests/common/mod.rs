//! Common test utilities for integration tests
//!
//! Shared fixtures used across the integration test files.

#![allow(dead_code)]

use lexicon::adapters::sqlite::{create_migrated_test_pool, SqliteTranslationRepository};
use lexicon::domain::models::{CacheConfig, TranslationInput};
use lexicon::infrastructure::AppServices;
use sqlx::SqlitePool;

/// Services wired over a fresh in-memory database.
///
/// The pool is returned as well so tests can query the store directly,
/// bypassing the cache.
pub async fn setup_services() -> (SqlitePool, AppServices) {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test database");
    let services = AppServices::build(pool.clone(), &CacheConfig::default());
    (pool, services)
}

/// Uncached repository over the same pool, for store-level assertions.
pub fn raw_repository(pool: &SqlitePool) -> SqliteTranslationRepository {
    SqliteTranslationRepository::new(pool.clone())
}

pub fn input(key: &str, locale: &str, content: &str) -> TranslationInput {
    TranslationInput::new(key, locale, content)
}

pub fn tagged(key: &str, locale: &str, content: &str, tags: &[&str]) -> TranslationInput {
    TranslationInput::new(key, locale, content).with_tags(tags.iter().copied())
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
