//! Cache-aside helpers over a [`CacheStore`].
//!
//! Values are stored as JSON. Every helper fails open: a backend error or an
//! undecodable entry is logged and treated as a miss, and a failed write or
//! invalidation is logged and dropped. The relational store stays the only
//! source of truth, so a broken cache costs latency and nothing else.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::ports::CacheStore;

/// A cache handle paired with the TTL used for everything it populates.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, or load, cache and return it.
    pub async fn remember<T, F, Fut>(&self, key: &str, load: F) -> DomainResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        if let Some(value) = self.read(key).await {
            return Ok(value);
        }

        let value = load().await?;
        self.write(key, &value).await;
        Ok(value)
    }

    /// Like [`remember`](Self::remember) for lookups that may find nothing.
    /// Absence is not cached.
    pub async fn remember_optional<T, F, Fut>(&self, key: &str, load: F) -> DomainResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<Option<T>>>,
    {
        if let Some(value) = self.read(key).await {
            return Ok(Some(value));
        }

        let value = load().await?;
        if let Some(found) = &value {
            self.write(key, found).await;
        }
        Ok(value)
    }

    /// Decode the entry under `key`. Misses, backend errors and undecodable
    /// entries all come back as `None`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key, error = %err, "undecodable cache entry, treating as miss");
                None
            }
        }
    }

    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to encode cache entry");
                return;
            }
        };

        if let Err(err) = self.store.set(key, raw, self.ttl).await {
            warn!(key, error = %err, "cache write failed");
        }
    }

    /// Whether a live entry exists. Errors count as absent.
    pub async fn exists(&self, key: &str) -> bool {
        match self.store.has(key).await {
            Ok(found) => found,
            Err(err) => {
                warn!(key, error = %err, "cache lookup failed, treating as miss");
                false
            }
        }
    }

    /// Drop every listed key.
    pub async fn forget<S: AsRef<str>>(&self, keys: &[S]) {
        for key in keys {
            let key = key.as_ref();
            if let Err(err) = self.store.delete(key).await {
                warn!(key, error = %err, "cache invalidation failed");
            }
        }
        debug!(count = keys.len(), "invalidated cache keys");
    }

    /// Drop the whole cache.
    pub async fn flush(&self) {
        if let Err(err) = self.store.clear_all().await {
            warn!(error = %err, "cache clear failed");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::cache::MokaCacheStore;
    use crate::domain::ports::{CacheError, CacheResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A backend where every operation fails.
    pub(crate) struct BrokenCacheStore;

    #[async_trait]
    impl CacheStore for BrokenCacheStore {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
        async fn has(&self, _key: &str) -> CacheResult<bool> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
        async fn clear_all(&self) -> CacheResult<()> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
    }

    fn cache() -> CacheAside {
        CacheAside::new(Arc::new(MokaCacheStore::new(100)), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_remember_loads_once() {
        let cache = cache();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Vec<String> = cache
                .remember("locales", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["en".to_string(), "fr".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["en", "fr"]);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remember_optional_does_not_cache_absence() {
        let cache = cache();

        let first: Option<String> = cache.remember_optional("k", || async { Ok(None) }).await.unwrap();
        assert!(first.is_none());
        assert!(!cache.exists("k").await);

        let second = cache
            .remember_optional("k", || async { Ok(Some("v".to_string())) })
            .await
            .unwrap();
        assert_eq!(second.as_deref(), Some("v"));
        assert!(cache.exists("k").await);
    }

    #[tokio::test]
    async fn test_load_errors_propagate_and_are_not_cached() {
        let cache = cache();
        let result: DomainResult<String> = cache
            .remember("k", || async { Err(crate::domain::DomainError::DatabaseError("down".into())) })
            .await;
        assert!(result.is_err());
        assert!(!cache.exists("k").await);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let cache = cache();
        cache.store().set("k", "not json".to_string(), Duration::from_secs(60)).await.unwrap();

        let value: u32 = cache.remember("k", || async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(cache.read::<u32>("k").await, Some(7));
    }

    #[tokio::test]
    async fn test_broken_backend_fails_open() {
        let cache = CacheAside::new(Arc::new(BrokenCacheStore), Duration::from_secs(60));

        let value: u32 = cache.remember("k", || async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert!(!cache.exists("k").await);

        cache.forget(&["k"]).await;
        cache.flush().await;
    }
}
