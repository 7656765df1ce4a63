//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::config::StoreConfig;
use crate::db::repository::ItemStore;
use crate::routes::ReviewHandler;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request handler; owns the shared store
    pub handler: ReviewHandler,
}

impl AppState {
    /// Create a new application state around a handler.
    pub fn new(handler: ReviewHandler) -> Self {
        Self { handler }
    }

    /// Create a new application state for `repository` configured by `config`.
    pub fn from_store(repository: Arc<dyn ItemStore>, config: &StoreConfig) -> Self {
        Self::new(ReviewHandler::from_config(repository, config))
    }
}
