use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for Lexicon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Pagination defaults for list and search
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".lexicon/lexicon.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// TTL for translation and tag entries
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// TTL for export aggregates
    #[serde(default = "default_ttl_secs")]
    pub export_ttl_secs: u64,

    /// Maximum number of cached entries
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

const fn default_ttl_secs() -> u64 {
    3600
}

const fn default_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            export_ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl CacheConfig {
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub const fn export_ttl(&self) -> Duration {
        Duration::from_secs(self.export_ttl_secs)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Pagination defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationConfig {
    /// Page size when a request does not name one
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// Upper bound on requested page sizes
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
}

const fn default_per_page() -> u32 {
    crate::domain::models::query::DEFAULT_PER_PAGE
}

const fn default_max_per_page() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

impl PaginationConfig {
    /// Resolve a requested page size against the configured bounds.
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|n| *n > 0)
            .unwrap_or(self.default_per_page)
            .min(self.max_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url(), "sqlite:.lexicon/lexicon.db");

        let explicit = DatabaseConfig {
            path: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        assert_eq!(explicit.url(), "sqlite::memory:");
    }

    #[test]
    fn test_pagination_resolve() {
        let pagination = PaginationConfig::default();
        assert_eq!(pagination.resolve(None), 15);
        assert_eq!(pagination.resolve(Some(0)), 15);
        assert_eq!(pagination.resolve(Some(40)), 40);
        assert_eq!(pagination.resolve(Some(500)), 100);
    }
}
