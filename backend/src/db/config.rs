//! Store configuration and environment variable handling.

use std::env;

/// Cap on conditional-insert attempts per create when none is configured.
pub const DEFAULT_MAX_CREATE_ATTEMPTS: usize = 10;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name of the table reviews are stored in
    pub table_name: String,
    /// Conditional-insert attempts per create before giving up
    pub max_create_attempts: usize,
}

impl StoreConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
        }
    }

    pub fn with_max_create_attempts(mut self, attempts: usize) -> Self {
        self.max_create_attempts = attempts;
        self
    }

    /// Create a store configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TABLE_NAME` (required): Table reviews are stored in
    /// - `MAX_CREATE_ATTEMPTS` (optional, default: 10): Conditional-insert
    ///   attempts per create
    ///
    /// # Errors
    /// Returns an error if required variables are not set or a value is invalid.
    pub fn from_env() -> Result<Self, String> {
        let table_name = env::var("TABLE_NAME")
            .map_err(|_| "TABLE_NAME environment variable not set".to_string())?;
        let max_create_attempts = match env::var("MAX_CREATE_ATTEMPTS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| "MAX_CREATE_ATTEMPTS must be a positive integer".to_string())?,
            Err(_) => DEFAULT_MAX_CREATE_ATTEMPTS,
        };

        let config = Self {
            table_name,
            max_create_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that parsing alone does not enforce.
    pub fn validate(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("table name must not be empty".to_string());
        }
        if self.max_create_attempts == 0 {
            return Err("max_create_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
