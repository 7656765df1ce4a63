//! Client-visible error taxonomy and its mapping onto responses.

use http::{Method, StatusCode};
use log::error;

use super::validation::ValidationError;
use crate::api::{ApiError, ApiResponse, ReviewId};
use crate::db::repository::RepositoryError;

/// Message returned for every store failure; the cause is only logged.
const STORE_FAILURE_MESSAGE: &str = "the review store could not complete the request";

/// Application error type for request handling.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing body, wrong type, out-of-range value, no-op update
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No review under this id, at read time or at a conditional write
    #[error("review {0} not found")]
    NotFound(ReviewId),

    /// Unexpected failure from the persistence layer
    #[error("store failure: {0}")]
    Store(RepositoryError),

    /// Failure outside the store, e.g. while encoding a response
    #[error("internal error: {0}")]
    Internal(String),

    /// Method/path combination not wired to any operation
    #[error("{method} {path} is not implemented")]
    NotImplemented { method: Method, path: String },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        if err.is_not_found() {
            let id = err.context().entity_id.clone().unwrap_or_default();
            AppError::NotFound(ReviewId::new(id))
        } else {
            AppError::Store(err)
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Stable reason code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(e) => e.code(),
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::NotImplemented { .. } => "NOT_IMPLEMENTED",
        }
    }

    /// Convert into a response. Server-side failures are logged in full and
    /// answered with a generic message.
    pub fn into_api_response(self) -> ApiResponse {
        let status = self.status();
        let body = match &self {
            AppError::Validation(e) => {
                let body = ApiError::new(e.code(), e.to_string());
                match e.field() {
                    Some(field) => body.with_field(field),
                    None => body,
                }
            }
            AppError::Store(e) => {
                error!("{}", store_failure_log(e));
                ApiError::new(self.code(), STORE_FAILURE_MESSAGE)
            }
            AppError::Internal(message) => {
                error!("internal error: {}", message);
                ApiError::new(self.code(), "internal server error")
            }
            AppError::NotFound(_) | AppError::NotImplemented { .. } => {
                ApiError::new(self.code(), self.to_string())
            }
        };
        ApiResponse::error(status, body)
    }
}

/// Server-side log line for a store failure, full cause included.
fn store_failure_log(err: &RepositoryError) -> String {
    format!("store failure (retryable={}): {}", err.is_retryable(), err)
}
