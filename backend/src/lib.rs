//! # Review API
//!
//! A minimal HTTP API for restaurant reviews backed by a single-table
//! key-value store with conditional writes.
//!
//! Each review is a flat record `{id, date, restaurant, stars}`. Clients can
//! list, create, fetch, partially update and delete reviews; identifiers are
//! short random strings allocated by the server.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain types and the transport-independent request/response model
//! - [`db`]: Store abstraction, in-memory backend, configuration and the store adapter
//! - [`routes`]: Dispatch, validation, error mapping and the request handler
//! - [`http`]: Axum-based HTTP server glue
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod routes;

#[cfg(feature = "http-server")]
pub mod http;
