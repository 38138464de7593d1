//! CLI command implementations.

pub mod export;
pub mod init;
pub mod locales;
pub mod serve;
pub mod tag;
pub mod translation;

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::AppServices;

/// Open the configured store and wire the services over it.
pub(crate) async fn connect(config: &Config) -> Result<AppServices> {
    AppServices::connect(config)
        .await
        .context("Failed to open the translation store. Run 'lexicon init' first.")
}
