//! Implementation of the `lexicon export` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::connect;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, TranslationExport};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Restrict to one locale
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Translations carrying any of these tags (comma-separated, repeatable)
    #[arg(short, long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Write the export to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct ExportOutput {
    pub path: PathBuf,
    pub entries: usize,
}

impl CommandOutput for ExportOutput {
    fn to_human(&self) -> String {
        format!("Exported {} entries to {}", self.entries, self.path.display())
    }
}

fn entry_count(export: &TranslationExport) -> usize {
    match export {
        TranslationExport::Flat(messages) => messages.len(),
        TranslationExport::ByLocale(groups) => groups.values().map(|m| m.len()).sum(),
    }
}

pub async fn execute(args: ExportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = connect(config).await?;
    let tags = (!args.tags.is_empty()).then_some(args.tags.as_slice());
    let locale = args.locale.as_deref().filter(|l| !l.is_empty());

    let export = services.translations.export_translations(locale, tags).await?;
    let body = serde_json::to_string_pretty(&export)?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, format!("{body}\n"))
                .await
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            let out = ExportOutput {
                entries: entry_count(&export),
                path,
            };
            output(&out, json_mode);
        }
        // The export is JSON either way.
        None => println!("{body}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_entry_count_sums_groups() {
        let mut en = BTreeMap::new();
        en.insert("a".to_string(), "A".to_string());
        en.insert("b".to_string(), "B".to_string());
        let mut fr = BTreeMap::new();
        fr.insert("a".to_string(), "A".to_string());

        let mut groups = BTreeMap::new();
        groups.insert("en".to_string(), en.clone());
        groups.insert("fr".to_string(), fr);

        assert_eq!(entry_count(&TranslationExport::ByLocale(groups)), 3);
        assert_eq!(entry_count(&TranslationExport::Flat(en)), 2);
    }
}
