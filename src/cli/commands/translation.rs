//! Translation CLI commands.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use super::connect;
use crate::cli::output::{output, short_id, truncate, CommandOutput};
use crate::domain::models::{
    Config, Page, PageRequest, SearchCriteria, Translation, TranslationFilter, TranslationInput,
    TranslationUpdate,
};
use crate::infrastructure::wiring::AppTranslationService;

#[derive(Args, Debug)]
pub struct TranslationArgs {
    #[command(subcommand)]
    pub command: TranslationCommands,
}

/// Filters shared by `list` and `search`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only this locale
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Keys containing this fragment
    #[arg(short, long)]
    pub key: Option<String>,

    /// Carrying at least one of these tag slugs (comma-separated)
    #[arg(short, long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Page size (bounded by pagination.max_per_page)
    #[arg(long)]
    pub per_page: Option<u32>,
}

impl FilterArgs {
    fn filter(&self) -> TranslationFilter {
        TranslationFilter {
            locale: self.locale.clone(),
            key_contains: self.key.clone().filter(|k| !k.is_empty()),
            tags: (!self.tags.is_empty()).then(|| self.tags.iter().cloned().collect()),
        }
    }

    fn page(&self, config: &Config) -> PageRequest {
        PageRequest::new(self.page, config.pagination.resolve(self.per_page))
    }
}

#[derive(Subcommand, Debug)]
pub enum TranslationCommands {
    /// Add a translation
    Add {
        /// Translation key, e.g. "checkout.title"
        key: String,
        /// Locale code, e.g. "en"
        locale: String,
        /// Translated text
        content: String,
        /// Tag names; missing tags are created (comma-separated)
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Show a translation by id, or by key with --locale
    Show {
        /// Translation id or key
        target: String,
        /// Locale, when looking up by key
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// List translations, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Full-text search over translation content
    Search {
        /// Words to match in the content
        query: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Update a translation
    Update {
        /// Translation id
        id: Uuid,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replace tags with these names (comma-separated)
        #[arg(short, long = "tag", value_delimiter = ',', conflicts_with = "clear_tags")]
        tags: Vec<String>,
        /// Remove every tag
        #[arg(long)]
        clear_tags: bool,
    },
    /// Delete a translation
    Delete {
        /// Translation id
        id: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct TranslationOutput {
    pub id: String,
    pub key: String,
    pub locale: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Translation> for TranslationOutput {
    fn from(t: &Translation) -> Self {
        Self {
            id: t.id.to_string(),
            key: t.key.clone(),
            locale: t.locale.clone(),
            content: t.content.clone(),
            tags: t.tag_slugs(),
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

impl CommandOutput for TranslationOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Translation: {}", self.key),
            format!("ID: {}", self.id),
            format!("Locale: {}", self.locale),
            format!("Content: {}", self.content),
        ];
        if !self.tags.is_empty() {
            lines.push(format!("Tags: {}", self.tags.join(", ")));
        }
        lines.push(format!("Updated: {}", self.updated_at));
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TranslationListOutput {
    pub translations: Vec<TranslationOutput>,
    pub total: u64,
    pub page: u32,
    pub last_page: u32,
}

impl From<Page<Translation>> for TranslationListOutput {
    fn from(page: Page<Translation>) -> Self {
        Self {
            translations: page.items.iter().map(TranslationOutput::from).collect(),
            total: page.total,
            page: page.page,
            last_page: page.last_page(),
        }
    }
}

impl CommandOutput for TranslationListOutput {
    fn to_human(&self) -> String {
        if self.translations.is_empty() {
            return "No translations found.".to_string();
        }

        let mut lines = vec![format!(
            "Found {} translation(s), page {} of {}:\n",
            self.total, self.page, self.last_page
        )];
        lines.push(format!("{:<8} {:<30} {:<8} {:<40}", "ID", "KEY", "LOCALE", "CONTENT"));
        lines.push("-".repeat(89));

        for t in &self.translations {
            lines.push(format!(
                "{:<8} {:<30} {:<8} {:<40}",
                &t.id[..8],
                truncate(&t.key, 28),
                truncate(&t.locale, 8),
                truncate(&t.content, 40)
            ));
        }

        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TranslationActionOutput {
    pub success: bool,
    pub message: String,
    pub translation: Option<TranslationOutput>,
}

impl CommandOutput for TranslationActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

async fn show(service: &AppTranslationService, target: &str, locale: Option<&str>) -> Result<Translation> {
    let found = match (Uuid::parse_str(target), locale) {
        (Ok(id), None) => service.find_translation(id).await?,
        (_, Some(locale)) => service.find_by_key(target, locale).await?,
        (Err(_), None) => bail!("'{target}' is not an id; pass --locale to look it up by key"),
    };
    found.ok_or_else(|| match locale {
        Some(locale) => anyhow!("Translation not found: {target} ({locale})"),
        None => anyhow!("Translation not found: {target}"),
    })
}

pub async fn execute(args: TranslationArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = connect(config).await?;
    let service = &services.translations;

    match args.command {
        TranslationCommands::Add { key, locale, content, tags } => {
            let mut input = TranslationInput::new(key, locale, content);
            if !tags.is_empty() {
                input = input.with_tags(tags);
            }
            let created = service.create_translation(input).await?;

            let out = TranslationActionOutput {
                success: true,
                message: format!("Translation created: {}", created.id),
                translation: Some(TranslationOutput::from(&created)),
            };
            output(&out, json_mode);
        }

        TranslationCommands::Show { target, locale } => {
            let translation = show(service, &target, locale.as_deref()).await?;
            output(&TranslationOutput::from(&translation), json_mode);
        }

        TranslationCommands::List { filter } => {
            let page = service.list_translations(&filter.filter(), filter.page(config)).await?;
            output(&TranslationListOutput::from(page), json_mode);
        }

        TranslationCommands::Search { query, filter } => {
            let criteria = SearchCriteria {
                filter: filter.filter(),
                content: Some(query),
                page: filter.page(config),
            };
            let page = service.search_translations(&criteria).await?;
            output(&TranslationListOutput::from(page), json_mode);
        }

        TranslationCommands::Update { id, key, locale, content, tags, clear_tags } => {
            let tags = if clear_tags {
                Some(vec![])
            } else {
                (!tags.is_empty()).then_some(tags)
            };
            let update = TranslationUpdate { key, locale, content, tags };

            let updated = service
                .update_translation(id, update)
                .await?
                .ok_or_else(|| anyhow!("Translation not found: {id}"))?;

            let out = TranslationActionOutput {
                success: true,
                message: format!("Translation updated: {}", short_id(&updated.id)),
                translation: Some(TranslationOutput::from(&updated)),
            };
            output(&out, json_mode);
        }

        TranslationCommands::Delete { id } => {
            if !service.delete_translation(id).await? {
                bail!("Translation not found: {id}");
            }

            let out = TranslationActionOutput {
                success: true,
                message: format!("Translation deleted: {id}"),
                translation: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::cli::Commands;
    use clap::Parser;

    fn parse(args: &[&str]) -> TranslationCommands {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Translation(args) => args.command,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_add_splits_tags() {
        let cmd = parse(&["lexicon", "translation", "add", "app.title", "en", "Hello", "--tag", "web,mobile"]);
        let TranslationCommands::Add { tags, .. } = cmd else {
            panic!("expected add");
        };
        assert_eq!(tags, vec!["web", "mobile"]);
    }

    #[test]
    fn test_list_filter_from_flags() {
        let cmd = parse(&["lexicon", "t", "list", "-l", "fr", "-k", "checkout", "-t", "web"]);
        let TranslationCommands::List { filter } = cmd else {
            panic!("expected list");
        };
        let filter = filter.filter();
        assert_eq!(filter.locale.as_deref(), Some("fr"));
        assert_eq!(filter.key_contains.as_deref(), Some("checkout"));
        assert_eq!(filter.tags.unwrap().into_iter().collect::<Vec<_>>(), vec!["web"]);
    }

    #[test]
    fn test_page_size_bounded_by_config() {
        let filter = FilterArgs { per_page: Some(10_000), page: 2, ..Default::default() };
        let page = filter.page(&Config::default());
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 100);
    }

    #[test]
    fn test_clear_tags_conflicts_with_tags() {
        let id = Uuid::new_v4().to_string();
        let result = Cli::try_parse_from(["lexicon", "translation", "update", &id, "--tag", "a", "--clear-tags"]);
        assert!(result.is_err());
    }
}
