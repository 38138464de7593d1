//! Lexicon CLI entry point.

use clap::Parser;

use lexicon::cli::{commands, handle_error, Cli, Commands};
use lexicon::infrastructure::config::ConfigLoader;
use lexicon::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the life of the process so the file writer flushes.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Translation(args) => commands::translation::execute(args, &config, cli.json).await,
        Commands::Tag(args) => commands::tag::execute(args, &config, cli.json).await,
        Commands::Locales => commands::locales::execute(&config, cli.json).await,
        Commands::Export(args) => commands::export::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
