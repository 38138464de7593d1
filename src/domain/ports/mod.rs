//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - TranslationRepository: relational storage of translations
//! - TagRepository: relational storage of tags
//! - CacheStore: TTL key/value cache in front of both
//!
//! Services depend on these traits only, so the store and cache can be
//! swapped without touching business logic.

pub mod cache_store;
pub mod tag_repository;
pub mod translation_repository;

pub use cache_store::{CacheError, CacheResult, CacheStore};
pub use tag_repository::TagRepository;
pub use translation_repository::{TranslationRepository, BULK_INSERT_BATCH_SIZE};
