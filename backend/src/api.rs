//! Public API surface for the review service.
//!
//! This file consolidates the domain types shared by the router, the validator
//! and the store adapter, together with the normalized request/response pair
//! the handler speaks. All payload types derive Serialize/Deserialize.

use std::fmt;

use chrono::NaiveDate;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db::repository::{ErrorContext, FieldAssignments, Item, RepositoryError};

/// Symbols a generated review identifier is drawn from (Crockford base32,
/// without the ambiguous letters I, L, O and U).
pub const ID_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of symbols in a generated review identifier.
pub const ID_LENGTH: usize = 5;

/// Storage format for review dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const ID_FIELD: &str = "id";
pub const DATE_FIELD: &str = "date";
pub const RESTAURANT_FIELD: &str = "restaurant";
pub const STARS_FIELD: &str = "stars";

// =============================================================================
// Identifiers
// =============================================================================

/// Review identifier (store primary key).
///
/// Identifiers taken from a request path are used verbatim, so a `ReviewId`
/// is not guaranteed to be well formed; see [`ReviewId::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub String);

impl ReviewId {
    pub fn new(value: impl Into<String>) -> Self {
        ReviewId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id has the shape of a generated identifier.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ID_LENGTH && self.0.bytes().all(|b| ID_ALPHABET.contains(&b))
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReviewId {
    fn from(value: &str) -> Self {
        ReviewId::new(value)
    }
}

// =============================================================================
// Review
// =============================================================================

/// Star rating, always within `1..=5`.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Stars(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Stars::new(value).ok_or_else(|| {
            format!(
                "stars must be between {} and {}, got {}",
                Stars::MIN,
                Stars::MAX,
                value
            )
        })
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub date: NaiveDate,
    pub restaurant: String,
    pub stars: Stars,
}

impl Review {
    /// Attach an identifier to a validated creation request.
    pub fn from_new(id: ReviewId, review: NewReview) -> Self {
        Self {
            id,
            date: review.date,
            restaurant: review.restaurant,
            stars: review.stars,
        }
    }

    /// Encode the review as a store item keyed on `id`.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(ID_FIELD.to_string(), Value::String(self.id.0.clone()));
        item.insert(DATE_FIELD.to_string(), date_value(self.date));
        item.insert(
            RESTAURANT_FIELD.to_string(),
            Value::String(self.restaurant.clone()),
        );
        item.insert(STARS_FIELD.to_string(), Value::from(self.stars.value()));
        item
    }

    /// Decode a store item.
    ///
    /// An item that does not decode is corrupt store data, reported as a
    /// validation error from the repository layer.
    pub fn from_item(item: Item) -> Result<Self, RepositoryError> {
        let key = item
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();
        serde_json::from_value(Value::Object(item)).map_err(|e| {
            RepositoryError::validation_with_context(
                format!("stored item is not a review: {}", e),
                ErrorContext::new("decode_item")
                    .with_entity("review")
                    .with_entity_id(key),
            )
        })
    }
}

/// Validated body of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub date: NaiveDate,
    pub restaurant: String,
    pub stars: Stars,
}

/// Validated body of a partial update. Absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub date: Option<NaiveDate>,
    pub restaurant: Option<String>,
    pub stars: Option<Stars>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.restaurant.is_none() && self.stars.is_none()
    }

    /// Store assignments for the present fields only.
    pub fn assignments(&self) -> FieldAssignments {
        let mut assignments = FieldAssignments::new();
        if let Some(date) = self.date {
            assignments = assignments.set(DATE_FIELD, date_value(date));
        }
        if let Some(restaurant) = &self.restaurant {
            assignments = assignments.set(RESTAURANT_FIELD, Value::String(restaurant.clone()));
        }
        if let Some(stars) = self.stars {
            assignments = assignments.set(STARS_FIELD, Value::from(stars.value()));
        }
        assignments
    }
}

fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

// =============================================================================
// Normalized request / response
// =============================================================================

/// A transport-independent HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Raw body bytes; `None` when the request carried no body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json(self, body: &Value) -> Self {
        self.with_body(body.to_string())
    }
}

/// Error body for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-checkable reason code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Offending request field, for field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// A transport-independent HTTP response.
///
/// Success payloads are wrapped as `{"data": ...}`, failures as
/// `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn data(status: StatusCode, payload: Value) -> Self {
        Self {
            status,
            body: Some(json!({ "data": payload })),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn error(status: StatusCode, error: ApiError) -> Self {
        Self {
            status,
            body: Some(json!({ "error": error })),
        }
    }

    /// The `data` member of a success body.
    pub fn data_payload(&self) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get("data"))
    }

    /// The `error.code` member of a failure body.
    pub fn error_code(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.pointer("/error/code"))
            .and_then(Value::as_str)
    }
}
