//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::{
    export::ExportArgs, init::InitArgs, serve::ServeArgs, tag::TagArgs,
    translation::TranslationArgs,
};

#[derive(Parser, Debug)]
#[command(name = "lexicon")]
#[command(about = "Lexicon - multi-locale translation store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Lexicon configuration and database
    Init(InitArgs),

    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Translation management commands
    #[command(alias = "t")]
    Translation(TranslationArgs),

    /// Tag management commands
    Tag(TagArgs),

    /// List the locales that have at least one translation
    Locales,

    /// Export translations as key/content maps
    Export(ExportArgs),
}
