//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database and
//! word list locations, and the leaderboard cache lifetime.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database path (`:memory:` for a throwaway database)
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// JSON word list (`{"words": [...]}`)
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,

    /// How long a computed leaderboard stays cached, in seconds
    #[serde(default = "default_cache_ttl")]
    pub leaderboard_cache_ttl_secs: u64,

    /// Default log filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "wordpool.db".to_string()
}

fn default_dictionary_path() -> String {
    "data/words.json".to_string()
}

/// Default leaderboard cache lifetime: 60 seconds
fn default_cache_ttl() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            dictionary_path: default_dictionary_path(),
            leaderboard_cache_ttl_secs: default_cache_ttl(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        // Validate required fields
        if config.dictionary_path.trim().is_empty() {
            return Err(ConfigError::MissingField("dictionary_path".to_string()));
        }
        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }

        Ok(config)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Leaderboard cache lifetime as a Duration
    pub fn leaderboard_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.leaderboard_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.dictionary_path, "data/words.json");
        assert_eq!(config.leaderboard_cache_ttl_secs, 60);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "/var/lib/wordpool/game.db"
            dictionary_path = "/etc/wordpool/words.json"
            leaderboard_cache_ttl_secs = 5
            log_level = "debug"
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.database_path, "/var/lib/wordpool/game.db");
        assert_eq!(config.dictionary_path, "/etc/wordpool/words.json");
        assert_eq!(config.leaderboard_cache_ttl(), Duration::from_secs(5));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.leaderboard_cache_ttl_secs, 60);
    }

    #[test]
    fn test_from_file_rejects_blank_dictionary_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dictionary_path = \"\"").unwrap();

        let result = ServerConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::MissingField(field)) if field == "dictionary_path"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = ServerConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
