//! Implementation of the `lexicon locales` command.

use anyhow::Result;

use super::connect;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, serde::Serialize)]
pub struct LocalesOutput {
    pub locales: Vec<String>,
}

impl CommandOutput for LocalesOutput {
    fn to_human(&self) -> String {
        if self.locales.is_empty() {
            "No locales yet.".to_string()
        } else {
            self.locales.join("\n")
        }
    }
}

pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let services = connect(config).await?;
    let locales = services.translations.available_locales().await?;
    output(&LocalesOutput { locales }, json_mode);
    Ok(())
}
