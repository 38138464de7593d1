//! In-process `CacheStore` backed by `moka`.
//!
//! Each entry carries its own expiry instant, so different key families can
//! use different TTLs inside one cache. Expired entries are dropped lazily on
//! access; capacity pressure evicts the rest.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::models::CacheConfig;
use crate::domain::ports::{CacheResult, CacheStore};

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Moka-based cache store shared by the repository decorators and the
/// export tier.
#[derive(Clone)]
pub struct MokaCacheStore {
    cache: Cache<String, Arc<CacheEntry>>,
}

impl MokaCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity)
    }

    /// Number of entries currently held, including not yet collected expired ones.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn live_entry(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let entry = self.cache.get(key).await?;
        if entry.is_expired() {
            self.cache.invalidate(key).await;
            return None;
        }
        Some(entry)
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), Arc::new(entry)).await;
        Ok(())
    }

    async fn has(&self, key: &str) -> CacheResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn clear_all(&self) -> CacheResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        debug!("cache cleared");
        Ok(())
    }
}
