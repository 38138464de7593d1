//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Project setup
//! - Service wiring

pub mod config;
pub mod logging;
pub mod setup;
pub mod wiring;

pub use wiring::AppServices;
