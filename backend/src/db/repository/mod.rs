//! Key-value store abstraction.
//!
//! The review service persists into a single table addressed by a string key.
//! Every mutation carries a [`Condition`] that the store evaluates atomically
//! with the write; when the condition does not hold the store answers with
//! [`RepositoryError::ConditionFailed`] and leaves the table untouched.

use async_trait::async_trait;
use serde_json::{Map, Value};

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Attribute every item is keyed on.
pub const KEY_ATTRIBUTE: &str = "id";

/// One stored record: a flat JSON object carrying [`KEY_ATTRIBUTE`].
pub type Item = Map<String, Value>;

/// Predicate over the current state of a key, checked atomically with a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Condition {
    /// Unconditional write.
    #[default]
    None,
    /// The key must not exist yet (conditional insert).
    KeyNotExists,
    /// The key must currently exist.
    KeyExists,
}

impl Condition {
    /// Evaluate the condition given whether the key is present.
    pub fn holds(&self, key_exists: bool) -> bool {
        match self {
            Condition::None => true,
            Condition::KeyNotExists => !key_exists,
            Condition::KeyExists => key_exists,
        }
    }
}

/// Ordered attribute assignments for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAssignments {
    fields: Vec<(String, Value)>,
}

impl FieldAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `attribute`, replacing an earlier assignment to it.
    pub fn set(mut self, attribute: impl Into<String>, value: Value) -> Self {
        let attribute = attribute.into();
        match self.fields.iter_mut().find(|(name, _)| *name == attribute) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((attribute, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether `attribute` is assigned.
    pub fn touches(&self, attribute: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Key of an item, when present and textual.
pub fn item_key(item: &Item) -> Option<&str> {
    item.get(KEY_ATTRIBUTE).and_then(Value::as_str)
}

/// Single-table key-value store with conditional writes.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one instance is shared by all
/// in-flight requests.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Name of the backing table.
    fn table_name(&self) -> &str;

    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Return every item, in store order.
    async fn scan(&self) -> RepositoryResult<Vec<Item>>;

    /// Fetch the item stored under `key`.
    ///
    /// # Returns
    /// * `Ok(None)` - The key is absent
    async fn get(&self, key: &str) -> RepositoryResult<Option<Item>>;

    /// Store `item` under its key attribute if `condition` holds.
    ///
    /// # Errors
    /// * `RepositoryError::ConditionFailed` - `condition` did not hold
    /// * `RepositoryError::ValidationError` - The item has no textual key
    async fn put(&self, item: Item, condition: Condition) -> RepositoryResult<()>;

    /// Remove `key` if `condition` holds.
    ///
    /// # Errors
    /// * `RepositoryError::ConditionFailed` - `condition` did not hold
    async fn delete(&self, key: &str, condition: Condition) -> RepositoryResult<()>;

    /// Apply `assignments` to the item under `key` if `condition` holds.
    ///
    /// With [`Condition::None`] a missing item is created from the key and the
    /// assignments.
    ///
    /// # Returns
    /// * `Ok(Item)` - The complete item after the update
    ///
    /// # Errors
    /// * `RepositoryError::ConditionFailed` - `condition` did not hold
    /// * `RepositoryError::ValidationError` - The assignments touch the key attribute
    async fn update(
        &self,
        key: &str,
        assignments: &FieldAssignments,
        condition: Condition,
    ) -> RepositoryResult<Item>;
}
