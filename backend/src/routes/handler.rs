//! Request handler for the review API.
//!
//! Control flow per request: route, then validate, then call the store
//! adapter. Invalid input is rejected before any store call, so a 400 never
//! leaves a partial write behind.

use std::sync::Arc;

use http::StatusCode;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use super::error::AppError;
use super::validation::{validate_create, validate_update, ValidationError};
use super::{resolve, Route};
use crate::api::{ApiRequest, ApiResponse, ReviewId};
use crate::db::config::{StoreConfig, DEFAULT_MAX_CREATE_ATTEMPTS};
use crate::db::ids::{IdGenerator, RandomIdGenerator};
use crate::db::repository::ItemStore;
use crate::db::services;

/// Result type for operations.
pub type HandlerResult = Result<ApiResponse, AppError>;

/// Stateless request handler around a shared store.
///
/// Cloning is cheap; clones share the store and the id generator.
#[derive(Clone)]
pub struct ReviewHandler {
    repository: Arc<dyn ItemStore>,
    ids: Arc<dyn IdGenerator>,
    max_create_attempts: usize,
}

impl ReviewHandler {
    /// Create a handler with random identifiers and the default create cap.
    pub fn new(repository: Arc<dyn ItemStore>) -> Self {
        Self {
            repository,
            ids: Arc::new(RandomIdGenerator),
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
        }
    }

    /// Create a handler honoring `config`.
    pub fn from_config(repository: Arc<dyn ItemStore>, config: &StoreConfig) -> Self {
        Self::new(repository).with_max_create_attempts(config.max_create_attempts)
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_create_attempts(mut self, attempts: usize) -> Self {
        self.max_create_attempts = attempts;
        self
    }

    pub fn repository(&self) -> &Arc<dyn ItemStore> {
        &self.repository
    }

    /// Handle one normalized request.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let route = resolve(&request.method, &request.path);
        debug!("{} {} -> {:?}", request.method, request.path, route);

        let body = request.body.as_deref();
        let result = match route {
            Route::ListReviews => self.list().await,
            Route::CreateReview => self.create(body).await,
            Route::GetReview(id) => self.get(id).await,
            Route::DeleteReview(id) => self.delete(id).await,
            Route::UpdateReview(id) => self.update(id, body).await,
            Route::NotImplemented => Err(AppError::NotImplemented {
                method: request.method.clone(),
                path: request.path.clone(),
            }),
        };

        result.unwrap_or_else(AppError::into_api_response)
    }

    /// Handle a request whose body the transport failed to read.
    ///
    /// Operations that read a body answer with `error`; the others ignore the
    /// body and run as usual.
    pub async fn handle_unreadable_body(
        &self,
        request: ApiRequest,
        error: ValidationError,
    ) -> ApiResponse {
        match resolve(&request.method, &request.path) {
            Route::CreateReview | Route::UpdateReview(_) => {
                warn!("{} {}: {}", request.method, request.path, error);
                AppError::from(error).into_api_response()
            }
            _ => self.handle(request).await,
        }
    }

    async fn list(&self) -> HandlerResult {
        let reviews = services::list_reviews(self.repository.as_ref()).await?;
        Ok(ApiResponse::data(StatusCode::OK, to_json(&reviews)?))
    }

    async fn create(&self, body: Option<&[u8]>) -> HandlerResult {
        let review = validate_create(body)?;
        let created = services::create_review(
            self.repository.as_ref(),
            self.ids.as_ref(),
            review,
            self.max_create_attempts,
        )
        .await?;
        Ok(ApiResponse::data(StatusCode::CREATED, to_json(&created)?))
    }

    async fn get(&self, id: ReviewId) -> HandlerResult {
        let found = services::get_review(self.repository.as_ref(), &id).await?;
        let review = found.ok_or(AppError::NotFound(id))?;
        Ok(ApiResponse::data(StatusCode::OK, to_json(&review)?))
    }

    async fn delete(&self, id: ReviewId) -> HandlerResult {
        services::delete_review(self.repository.as_ref(), &id).await?;
        Ok(ApiResponse::empty(StatusCode::NO_CONTENT))
    }

    async fn update(&self, id: ReviewId, body: Option<&[u8]>) -> HandlerResult {
        let patch = validate_update(body)?;
        let updated = services::update_review(self.repository.as_ref(), &id, &patch).await?;
        Ok(ApiResponse::data(StatusCode::OK, to_json(&updated)?))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}
