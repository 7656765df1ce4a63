//! Service layer translating review operations into store calls.
//!
//! These functions work with any [`ItemStore`] implementation. Each awaits one
//! store call at a time; the create loop issues its conditional inserts
//! sequentially.
//!
//! Condition failures are interpreted per operation: on create a failed
//! `KeyNotExists` insert means the candidate id is taken and another one is
//! tried; on delete and update a failed `KeyExists` means the review is gone
//! and is reported as [`RepositoryError::NotFound`].

use log::{debug, error, warn};

use super::ids::IdGenerator;
use super::repository::{Condition, ErrorContext, ItemStore, RepositoryError, RepositoryResult};
use crate::api::{NewReview, Review, ReviewId, ReviewPatch};

const ENTITY: &str = "review";

/// Check that the store is reachable.
pub async fn health_check(repo: &dyn ItemStore) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List every review, in whatever order the store yields them.
pub async fn list_reviews(repo: &dyn ItemStore) -> RepositoryResult<Vec<Review>> {
    let items = repo
        .scan()
        .await
        .map_err(|e| e.with_operation("list_reviews"))?;
    debug!("scanned {} review(s) from {}", items.len(), repo.table_name());
    items.into_iter().map(Review::from_item).collect()
}

/// Fetch a review.
///
/// # Returns
/// * `Ok(None)` - No review is stored under `id`
pub async fn get_review(repo: &dyn ItemStore, id: &ReviewId) -> RepositoryResult<Option<Review>> {
    let item = repo
        .get(id.as_str())
        .await
        .map_err(|e| e.with_operation("get_review").with_entity_id(id))?;
    item.map(Review::from_item).transpose()
}

/// Store a new review under a freshly generated identifier.
///
/// Candidates come from `ids` and are inserted with a `KeyNotExists`
/// condition; a taken candidate is discarded and another one drawn, up to
/// `max_attempts` times.
///
/// # Errors
/// * `RepositoryError::InternalError` - Every attempt collided
/// * Any store error other than a condition failure, returned immediately
pub async fn create_review(
    repo: &dyn ItemStore,
    ids: &dyn IdGenerator,
    review: NewReview,
    max_attempts: usize,
) -> RepositoryResult<Review> {
    for attempt in 1..=max_attempts {
        let candidate = Review::from_new(ids.generate(), review.clone());
        match repo.put(candidate.to_item(), Condition::KeyNotExists).await {
            Ok(()) => {
                debug!("created review {} on attempt {}", candidate.id, attempt);
                return Ok(candidate);
            }
            Err(e) if e.is_condition_failed() => {
                warn!(
                    "review id {} already taken (attempt {}/{})",
                    candidate.id, attempt, max_attempts
                );
            }
            Err(e) => {
                return Err(e
                    .with_operation("create_review")
                    .with_entity_id(&candidate.id));
            }
        }
    }

    error!("no free review id after {} attempts", max_attempts);
    Err(RepositoryError::internal_with_context(
        format!("no free review id after {} attempts", max_attempts),
        ErrorContext::new("create_review").with_entity(ENTITY),
    ))
}

/// Delete a review.
///
/// # Errors
/// * `RepositoryError::NotFound` - No review is stored under `id`
pub async fn delete_review(repo: &dyn ItemStore, id: &ReviewId) -> RepositoryResult<()> {
    repo.delete(id.as_str(), Condition::KeyExists)
        .await
        .map_err(|e| absent_as_not_found(e, "delete_review", id))
}

/// Apply a partial update and return the complete updated review.
///
/// # Errors
/// * `RepositoryError::NotFound` - No review is stored under `id`
/// * `RepositoryError::ValidationError` - `patch` changes nothing
pub async fn update_review(
    repo: &dyn ItemStore,
    id: &ReviewId,
    patch: &ReviewPatch,
) -> RepositoryResult<Review> {
    if patch.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "update changes no fields",
            ErrorContext::new("update_review")
                .with_entity(ENTITY)
                .with_entity_id(id),
        ));
    }

    let item = repo
        .update(id.as_str(), &patch.assignments(), Condition::KeyExists)
        .await
        .map_err(|e| absent_as_not_found(e, "update_review", id))?;
    Review::from_item(item)
}

fn absent_as_not_found(err: RepositoryError, operation: &str, id: &ReviewId) -> RepositoryError {
    if err.is_condition_failed() {
        RepositoryError::not_found_with_context(
            format!("review {} does not exist", id),
            ErrorContext::new(operation)
                .with_entity(ENTITY)
                .with_entity_id(id),
        )
    } else {
        err.with_operation(operation).with_entity_id(id)
    }
}
