//! Store configuration file support.
//!
//! This module provides utilities for reading store configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config::{StoreConfig, DEFAULT_MAX_CREATE_ATTEMPTS};
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "review-api.toml";

/// Store configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub store: StoreSettings,
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,
    pub table_name: String,
    #[serde(default = "default_max_create_attempts")]
    pub max_create_attempts: usize,
}

fn default_store_type() -> String {
    "local".to_string()
}

fn default_max_create_attempts() -> usize {
    DEFAULT_MAX_CREATE_ATTEMPTS
}

impl RepositoryConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `review-api.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Get the store type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.store.store_type)
    }

    /// Convert to a validated `StoreConfig`.
    pub fn to_store_config(&self) -> Result<StoreConfig, RepositoryError> {
        let config = StoreConfig::new(self.store.table_name.clone())
            .with_max_create_attempts(self.store.max_create_attempts);
        config.validate().map_err(RepositoryError::configuration)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[store]
type = "local"
table_name = "reviews-dev"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);

        let store = config.to_store_config().unwrap();
        assert_eq!(store.table_name, "reviews-dev");
        assert_eq!(store.max_create_attempts, DEFAULT_MAX_CREATE_ATTEMPTS);
    }

    #[test]
    fn test_type_defaults_to_local() {
        let toml = r#"
[store]
table_name = "reviews"
max_create_attempts = 3
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.to_store_config().unwrap().max_create_attempts, 3);
    }

    #[test]
    fn test_table_name_is_required() {
        let toml = r#"
[store]
type = "local"
"#;
        assert!(RepositoryConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let toml = r#"
[store]
table_name = "reviews"
max_create_attempts = 0
"#;
        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        let err = config.to_store_config().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_unknown_store_type() {
        let toml = r#"
[store]
type = "cassandra"
table_name = "reviews"
"#;
        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }
}
