//! Request body validation.
//!
//! Pure functions of the raw body: they never touch the store, and every
//! rejection carries a stable code.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::api::{NewReview, ReviewPatch, Stars, DATE_FIELD, RESTAURANT_FIELD, STARS_FIELD};

/// Date-time layouts accepted besides plain dates and RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Rejection produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is required")]
    MissingBody,

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("request body sets none of date, restaurant, stars")]
    NoFieldsToUpdate,

    #[error("request body exceeds the size limit")]
    BodyTooLarge,

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),
}

impl ValidationError {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingBody => "MISSING_BODY",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::NotAnObject => "NOT_AN_OBJECT",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
            Self::BodyTooLarge => "BODY_TOO_LARGE",
            Self::UnreadableBody(_) => "UNREADABLE_BODY",
        }
    }

    /// The offending field, for field-level rejections.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Decode the body into a JSON object.
///
/// An absent or blank body is `MissingBody`; bytes that are not JSON (or not
/// UTF-8) are `InvalidJson`; any JSON value other than an object is
/// `NotAnObject`.
pub fn parse_body(body: Option<&[u8]>) -> Result<Map<String, Value>, ValidationError> {
    let raw = body
        .filter(|bytes| !bytes.iter().all(u8::is_ascii_whitespace))
        .ok_or(ValidationError::MissingBody)?;

    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(ValidationError::NotAnObject),
    }
}

/// Validate a create request. All of `restaurant`, `stars` and `date` are
/// required; unknown fields are ignored.
pub fn validate_create(body: Option<&[u8]>) -> Result<NewReview, ValidationError> {
    let fields = parse_body(body)?;
    Ok(NewReview {
        restaurant: required(&fields, RESTAURANT_FIELD, parse_restaurant)?,
        stars: required(&fields, STARS_FIELD, parse_stars)?,
        date: required(&fields, DATE_FIELD, parse_date)?,
    })
}

/// Validate a partial update. At least one of `date`, `restaurant` and
/// `stars` must be present; each present one follows the create rules.
pub fn validate_update(body: Option<&[u8]>) -> Result<ReviewPatch, ValidationError> {
    let fields = parse_body(body)?;
    let patch = ReviewPatch {
        date: optional(&fields, DATE_FIELD, parse_date)?,
        restaurant: optional(&fields, RESTAURANT_FIELD, parse_restaurant)?,
        stars: optional(&fields, STARS_FIELD, parse_stars)?,
    };

    if patch.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    Ok(patch)
}

fn required<T>(
    fields: &Map<String, Value>,
    field: &'static str,
    parse: fn(&Value) -> Result<T, String>,
) -> Result<T, ValidationError> {
    let value = fields.get(field).ok_or_else(|| ValidationError::InvalidField {
        field,
        reason: "field is required".to_string(),
    })?;
    parse(value).map_err(|reason| ValidationError::InvalidField { field, reason })
}

fn optional<T>(
    fields: &Map<String, Value>,
    field: &'static str,
    parse: fn(&Value) -> Result<T, String>,
) -> Result<Option<T>, ValidationError> {
    fields
        .get(field)
        .map(|value| parse(value).map_err(|reason| ValidationError::InvalidField { field, reason }))
        .transpose()
}

/// `restaurant` must be a non-blank string.
pub fn parse_restaurant(value: &Value) -> Result<String, String> {
    match value {
        Value::String(name) if !name.trim().is_empty() => Ok(name.clone()),
        Value::String(_) => Err("must not be empty".to_string()),
        _ => Err("must be a string".to_string()),
    }
}

/// `stars` must be a JSON integer from 1 to 5. Strings, floats and booleans
/// are rejected even when they look like a valid rating.
pub fn parse_stars(value: &Value) -> Result<Stars, String> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Stars::new)
        .ok_or_else(|| format!("must be an integer from {} to {}", Stars::MIN, Stars::MAX))
}

/// `date` must be a string holding a valid calendar date.
pub fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    let text = value
        .as_str()
        .ok_or_else(|| "must be a date string".to_string())?;
    parse_calendar_date(text).ok_or_else(|| format!("'{}' is not a valid calendar date", text))
}

/// Parse a calendar date, discarding any time of day and offset.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times and naive date-times. The date
/// is taken as written: `2024-03-01T23:30:00-05:00` is March 1st.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
}
