//! Cache layer: a TTL key/value store in front of the relational store.
//!
//! `MokaCacheStore` implements the `CacheStore` port in-process. The
//! repository decorators wrap any store-backed repository with cache-aside
//! reads and key-based invalidation on writes.

pub mod cache_aside;
pub mod cached_tag_repository;
pub mod cached_translation_repository;
pub mod keys;
pub mod moka_store;

pub use cache_aside::CacheAside;
pub use cached_tag_repository::CachedTagRepository;
pub use cached_translation_repository::CachedTranslationRepository;
pub use moka_store::MokaCacheStore;
