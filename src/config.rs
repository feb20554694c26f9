//! Server configuration.

use crate::games::tictactoe::OpponentPolicy;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for the HTTP server.
///
/// Values come from a TOML file when one is given, then from environment
/// variables and command-line flags, later sources winning.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// How the automatic opponent picks its square.
    #[serde(default)]
    opponent: OpponentPolicy,

    /// Seed for the random opponent.
    #[serde(default)]
    opponent_seed: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "tictactoe.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            opponent: OpponentPolicy::default(),
            opponent_seed: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()
    }

    /// Replaces fields with any values given on the command line or in the
    /// environment.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_url: Option<String>,
        opponent: Option<OpponentPolicy>,
        opponent_seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(opponent) = opponent {
            self.opponent = opponent;
        }
        if opponent_seed.is_some() {
            self.opponent_seed = opponent_seed;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::new("database_url must not be empty".to_string()));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(*config.port(), 3000);
        assert_eq!(*config.opponent(), OpponentPolicy::FirstEmpty);
    }

    #[test]
    fn test_toml_fields() {
        let config = ServerConfig::from_toml(
            r#"
            host = "0.0.0.0"
            port = 8080
            database_url = "/var/lib/tictactoe/games.db"
            opponent = "random"
            opponent_seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.opponent(), OpponentPolicy::Random);
        assert_eq!(*config.opponent_seed(), Some(9));
    }

    #[test]
    fn test_overrides_win() {
        let config = ServerConfig::default()
            .with_overrides(None, Some(4000), Some("other.db".to_string()), None, None)
            .unwrap();
        assert_eq!(*config.port(), 4000);
        assert_eq!(config.database_url(), "other.db");
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let err = ServerConfig::default()
            .with_overrides(None, None, Some(" ".to_string()), None, None)
            .unwrap_err();
        assert!(err.message.contains("database_url"));
    }

    #[test]
    fn test_bad_policy_rejected() {
        assert!(ServerConfig::from_toml(r#"opponent = "minimax""#).is_err());
    }
}
