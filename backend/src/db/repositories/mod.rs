//! Store implementations module.
//!
//! This module contains implementations of the `ItemStore` trait:
//! - `local`: In-memory implementation for local development and testing
pub mod local;

pub use local::{LocalRepository, DEFAULT_TABLE_NAME};
