//! HTTP server module for the review API.
//!
//! This module adapts axum to the transport-independent handler: every request
//! is normalized into an [`ApiRequest`](crate::api::ApiRequest), handled by
//! [`ReviewHandler`](crate::routes::ReviewHandler), and the resulting
//! [`ApiResponse`](crate::api::ApiResponse) is written back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum fallback handler)                       │
//! │  - Method, path and raw body extraction                   │
//! │  - CORS, compression, tracing, body limit                 │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Review handler (routes/)                                 │
//! │  - Routing, validation, error mapping                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Store adapter + ItemStore (db/)                          │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
