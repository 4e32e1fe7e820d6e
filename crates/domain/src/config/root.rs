use serde::{Deserialize, Serialize};

use super::database::DatabaseConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::lookup::LookupConfig;
use super::security::SecurityConfig;
use super::status_check::StatusCheckConfig;

/// Main configuration structure for porttrace
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Resolution tuning (session window, timeouts, deadline)
    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Credential encryption
    #[serde(default)]
    pub security: SecurityConfig,

    /// Background reachability checks
    #[serde(default)]
    pub status_check: StatusCheckConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. porttrace.toml in current directory
    /// 3. /etc/porttrace/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = json;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.max_concurrent_sessions == 0 {
            return Err(ConfigError::Validation(
                "lookup.max_concurrent_sessions must be at least 1".to_string(),
            ));
        }

        if self.lookup.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "lookup.command_timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.lookup.query_deadline_secs == Some(0) {
            return Err(ConfigError::Validation(
                "lookup.query_deadline_secs cannot be 0".to_string(),
            ));
        }

        if self.status_check.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "status_check.interval_secs cannot be 0".to_string(),
            ));
        }

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Writes the configuration as TOML. An existing file is only replaced
    /// when `overwrite` is set.
    pub fn save(&self, path: &str, overwrite: bool) -> Result<(), ConfigError> {
        if !overwrite && std::path::Path::new(path).exists() {
            return Err(ConfigError::FileWrite(
                path.to_string(),
                "file already exists".to_string(),
            ));
        }
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("porttrace.toml").exists() {
            Some("porttrace.toml".to_string())
        } else if std::path::Path::new("/etc/porttrace/config.toml").exists() {
            Some("/etc/porttrace/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}
