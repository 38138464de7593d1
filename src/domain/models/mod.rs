pub mod config;
pub mod export;
pub mod query;
pub mod tag;
pub mod translation;

pub use config::{
    CacheConfig, Config, DatabaseConfig, LoggingConfig, PaginationConfig, ServerConfig,
};
pub use export::{LocaleMessages, TranslationExport};
pub use query::{Page, PageRequest, SearchCriteria, TranslationFilter, DEFAULT_PER_PAGE};
pub use tag::{slugify, NewTag, Tag, TagPatch};
pub use translation::{
    NewTranslation, Translation, TranslationInput, TranslationPatch, TranslationUpdate,
};
