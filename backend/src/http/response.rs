//! Conversion of handler responses into axum responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::api::ApiResponse;
use crate::routes::AppError;

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_api_response().into_response()
    }
}
