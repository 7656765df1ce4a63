//! HTTP handlers for the REST API.
//!
//! A single fallback handler serves every method and path; routing happens in
//! [`crate::routes::resolve`] so the transport adds no rules of its own.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode, Uri},
};

use super::state::AppState;
use crate::api::{ApiRequest, ApiResponse};
use crate::routes::ValidationError;

/// Any method, any path.
///
/// An empty body is passed on as an absent one. A body that cannot be read,
/// e.g. one over the size limit, is reported through the regular error body.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse {
    let request = ApiRequest::new(method, uri.path());
    match body {
        Ok(bytes) if bytes.is_empty() => state.handler.handle(request).await,
        Ok(bytes) => state.handler.handle(request.with_body(bytes.to_vec())).await,
        Err(rejection) => {
            state
                .handler
                .handle_unreadable_body(request, body_error(&rejection))
                .await
        }
    }
}

fn body_error(rejection: &BytesRejection) -> ValidationError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::BodyTooLarge
    } else {
        ValidationError::UnreadableBody(rejection.body_text())
    }
}
