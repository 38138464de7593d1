//! Cache store port.
//!
//! String-keyed, string-valued store with per-entry TTL. Values are
//! serialized by the caller; the store never interprets them. Nothing here is
//! authoritative: every entry can be rebuilt from the relational store.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache with TTL expiry.
///
/// Only per-key last-write-wins is expected of implementations; callers never
/// rely on atomicity across keys.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a live entry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store an entry that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Whether a live entry exists for `key`.
    async fn has(&self, key: &str) -> CacheResult<bool>;

    /// Remove one entry. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every entry.
    async fn clear_all(&self) -> CacheResult<()>;
}
