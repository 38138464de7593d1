//! Tag CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use super::connect;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, NewTag, Tag};
use crate::infrastructure::wiring::AppTagService;

#[derive(Args, Debug)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommands,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List tags by name
    List,
    /// Create a tag
    Add {
        /// Display name
        name: String,
        /// Explicit slug (derived from the name when omitted)
        #[arg(short, long)]
        slug: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a tag by id or slug
    Delete {
        /// Tag id or slug
        target: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct TagOutput {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<&Tag> for TagOutput {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            description: tag.description.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TagListOutput {
    pub tags: Vec<TagOutput>,
    pub total: usize,
}

impl CommandOutput for TagListOutput {
    fn to_human(&self) -> String {
        if self.tags.is_empty() {
            return "No tags found.".to_string();
        }

        let mut lines = vec![format!("Found {} tag(s):\n", self.total)];
        lines.push(format!("{:<36} {:<20} {:<20} {:<30}", "ID", "NAME", "SLUG", "DESCRIPTION"));
        lines.push("-".repeat(109));
        for tag in &self.tags {
            lines.push(format!(
                "{:<36} {:<20} {:<20} {:<30}",
                tag.id,
                truncate(&tag.name, 20),
                truncate(&tag.slug, 20),
                truncate(tag.description.as_deref().unwrap_or("-"), 30)
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TagActionOutput {
    pub success: bool,
    pub message: String,
    pub tag: Option<TagOutput>,
}

impl CommandOutput for TagActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

async fn resolve(service: &AppTagService, target: &str) -> Result<Tag> {
    let found = match Uuid::parse_str(target) {
        Ok(id) => service.find_tag(id).await?,
        Err(_) => service.find_by_slug(target).await?,
    };
    found.ok_or_else(|| anyhow!("Tag not found: {target}"))
}

pub async fn execute(args: TagArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = connect(config).await?;
    let service = &services.tags;

    match args.command {
        TagCommands::List => {
            let tags = service.list_tags().await?;
            let out = TagListOutput {
                total: tags.len(),
                tags: tags.iter().map(TagOutput::from).collect(),
            };
            output(&out, json_mode);
        }

        TagCommands::Add { name, slug, description } => {
            let tag = service.create_tag(NewTag { name, slug, description }).await?;
            let out = TagActionOutput {
                success: true,
                message: format!("Tag created: {} ({})", tag.name, tag.slug),
                tag: Some(TagOutput::from(&tag)),
            };
            output(&out, json_mode);
        }

        TagCommands::Delete { target } => {
            let tag = resolve(service, &target).await?;
            service.delete_tag(tag.id).await?;
            let out = TagActionOutput {
                success: true,
                message: format!("Tag deleted: {}", tag.slug),
                tag: Some(TagOutput::from(&tag)),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
