//! Request routing, validation and handling.
//!
//! - [`resolve`]: pure dispatch from `(method, path)` to a [`Route`]
//! - [`validation`]: body checks per operation, independent of persistence
//! - [`handler`]: wires routing, validation and the store adapter together
//! - [`error`]: client-visible error taxonomy

pub mod error;
pub mod handler;
pub mod validation;

pub use error::AppError;
pub use handler::{HandlerResult, ReviewHandler};
pub use validation::ValidationError;

use http::Method;

use crate::api::ReviewId;

/// Operation selected for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// GET /
    ListReviews,
    /// POST /
    CreateReview,
    /// GET /{id}
    GetReview(ReviewId),
    /// DELETE /{id}
    DeleteReview(ReviewId),
    /// PATCH /{id}
    UpdateReview(ReviewId),
    /// Any other method/path combination
    NotImplemented,
}

/// Select the operation for `(method, path)`.
///
/// Everything after the leading slash is the literal review id; it is not
/// decoded or normalized.
pub fn resolve(method: &Method, path: &str) -> Route {
    let Some(rest) = path.strip_prefix('/') else {
        return Route::NotImplemented;
    };

    if rest.is_empty() {
        return match *method {
            Method::GET => Route::ListReviews,
            Method::POST => Route::CreateReview,
            _ => Route::NotImplemented,
        };
    }

    let id = ReviewId::new(rest);
    match *method {
        Method::GET => Route::GetReview(id),
        Method::DELETE => Route::DeleteReview(id),
        Method::PATCH => Route::UpdateReview(id),
        _ => Route::NotImplemented,
    }
}
