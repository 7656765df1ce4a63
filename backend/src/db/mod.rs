//! Persistence module for review records.
//!
//! This module provides an abstraction over a single-table key-value store with
//! conditional writes, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Request handler (routes::ReviewHandler)                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Store Adapter            │
//! │  - Identifier allocation with collision retry           │
//! │  - Conditional delete / update, absent => not found     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ItemStore Trait (repository/) - Abstract Interface     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use review_api::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let configured = RepositoryFactory::from_env()?;
//!     let reviews = services::list_reviews(configured.store.as_ref()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod factory;
pub mod ids;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::{StoreConfig, DEFAULT_MAX_CREATE_ATTEMPTS};
pub use factory::{ConfiguredStore, RepositoryFactory, RepositoryType};
pub use ids::{IdGenerator, RandomIdGenerator};
#[cfg(any(test, feature = "test-util"))]
pub use ids::ScriptedIdGenerator;
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    Condition, ErrorContext, FieldAssignments, Item, ItemStore, RepositoryError,
    RepositoryResult, KEY_ATTRIBUTE,
};
