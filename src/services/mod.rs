//! Business services orchestrating repositories and the export cache tier.

pub mod tag_service;
pub mod translation_service;

pub use tag_service::TagService;
pub use translation_service::TranslationService;
