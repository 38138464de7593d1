//! HTTP adapter: axum router over the translation and tag services.

pub mod dto;
pub mod server;

pub use dto::{ErrorResponse, PageResponse, TagResponse, TranslationResponse};
pub use server::{HttpConfig, LexiconHttpServer};
