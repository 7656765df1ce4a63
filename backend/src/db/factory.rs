//! Store factory for dependency injection.
//!
//! The store is built once at process start and handed to the request handler;
//! nothing in the crate keeps a module-level store instance.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::config::StoreConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{ItemStore, RepositoryError, RepositoryResult};

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local table
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse store type from string ("local", "memory", "in-memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get store type from the `REPOSITORY_TYPE` environment variable.
    ///
    /// Defaults to Local when the variable is not set.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(val) => val.parse(),
            Err(_) => Ok(Self::Local),
        }
    }
}

/// A store together with the configuration it was built from.
#[derive(Clone)]
pub struct ConfiguredStore {
    pub store: Arc<dyn ItemStore>,
    pub config: StoreConfig,
}

/// Store factory.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a store instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of store to create
    /// * `config` - Store configuration
    pub fn create(
        repo_type: RepositoryType,
        config: &StoreConfig,
    ) -> RepositoryResult<Arc<dyn ItemStore>> {
        config.validate().map_err(RepositoryError::configuration)?;
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local(&config.table_name)),
        }
    }

    /// Create an in-memory local store.
    pub fn create_local(table_name: &str) -> Arc<dyn ItemStore> {
        Arc::new(LocalRepository::new(table_name))
    }

    /// Create a store from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` plus the variables documented on
    /// [`StoreConfig::from_env`].
    pub fn from_env() -> RepositoryResult<ConfiguredStore> {
        let repo_type = RepositoryType::from_env().map_err(RepositoryError::configuration)?;
        let config = StoreConfig::from_env().map_err(RepositoryError::configuration)?;
        Self::configured(repo_type, config)
    }

    /// Create a store from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the review-api.toml configuration file
    pub fn from_config_file<P: AsRef<Path>>(config_path: P) -> RepositoryResult<ConfiguredStore> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create a store from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<ConfiguredStore> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    fn from_repository_config(config: &RepositoryConfig) -> RepositoryResult<ConfiguredStore> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::configured(repo_type, config.to_store_config()?)
    }

    fn configured(
        repo_type: RepositoryType,
        config: StoreConfig,
    ) -> RepositoryResult<ConfiguredStore> {
        let store = Self::create(repo_type, &config)?;
        info!(
            "{:?} store ready (table={}, max_create_attempts={})",
            repo_type, config.table_name, config.max_create_attempts
        );
        Ok(ConfiguredStore { store, config })
    }
}
