//! Domain layer for the Lexicon translation store
//!
//! This module contains the core models, the error taxonomy and the port
//! traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
