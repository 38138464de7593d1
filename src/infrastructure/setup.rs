//! Lexicon setup and initialization infrastructure
//!
//! Handles project initialization including:
//! - Configuration directory creation
//! - Default config file creation
//! - Database creation and migrations

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::sqlite::initialize_database;
use crate::infrastructure::config::CONFIG_DIR;

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Lexicon Configuration
# Override settings by editing this file, adding .lexicon/local.yaml, or
# setting environment variables with the LEXICON_ prefix
#
# Example environment variables:
#   export LEXICON_DATABASE__PATH=/custom/path/lexicon.db
#   export LEXICON_LOGGING__LEVEL=debug
#   export LEXICON_CACHE__TTL_SECS=600

# Database configuration
database:
  # Path to SQLite database file (project-local)
  path: ".lexicon/lexicon.db"

  # Maximum number of database connections in pool
  max_connections: 10

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "json"

# Cache configuration
cache:
  # TTL in seconds for translation and tag entries
  ttl_secs: 3600

  # TTL in seconds for export aggregates
  export_ttl_secs: 3600

  # Maximum number of cached entries
  max_capacity: 10000

# HTTP server
server:
  host: "127.0.0.1"
  port: 8080
  enable_cors: true

# Pagination for list and search
pagination:
  default_per_page: 15
  max_per_page: 100
"#;

/// Setup paths and directories
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::for_root(current_dir))
    }

    /// Setup paths for a project rooted at `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("lexicon.db"),
            config_dir,
        }
    }

    /// Check if Lexicon is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(())
}

/// Create the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Create the database if needed and apply pending migrations.
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let db_url = format!("sqlite:{}", paths.database_file.display());
    let pool = initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;
    Ok(())
}
