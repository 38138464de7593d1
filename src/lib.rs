//! Lexicon - multi-locale translation store
//!
//! Lexicon stores translations (a key, a locale and its content) grouped by
//! tags in SQLite, serves reads through a cache-aside layer, and exports
//! key/content maps per locale or tag set.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the repository/cache ports
//! - **Adapter Layer** (`adapters`): SQLite store, moka cache, HTTP API
//! - **Service Layer** (`services`): Tag resolution and the cached export tier
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, setup and wiring
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use lexicon::infrastructure::{config::ConfigLoader, AppServices};
//! use lexicon::domain::models::TranslationInput;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let services = AppServices::connect(&config).await?;
//!     services
//!         .translations
//!         .create_translation(TranslationInput::new("app.title", "en", "Welcome"))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, NewTag, Page, PageRequest, SearchCriteria, Tag, Translation, TranslationExport,
    TranslationFilter, TranslationInput, TranslationUpdate,
};
pub use domain::ports::{CacheStore, TagRepository, TranslationRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::AppServices;
pub use services::{TagService, TranslationService};
