//! In-memory store for local development and testing.
//!
//! Each conditional write checks its condition and mutates the table under a
//! single write lock, so racing conditional writes to the same key are
//! linearizable: of two `KeyExists` deletes, exactly one succeeds.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde_json::Value;

use crate::db::repository::{
    item_key, Condition, ErrorContext, FieldAssignments, Item, ItemStore, RepositoryError,
    RepositoryResult, KEY_ATTRIBUTE,
};

/// Default table name when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "reviews";

/// In-memory single-table store.
#[derive(Debug)]
pub struct LocalRepository {
    table_name: String,
    items: RwLock<HashMap<String, Item>>,
}

impl LocalRepository {
    /// Create an empty table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn condition_failed(&self, operation: &str, key: &str, condition: Condition) -> RepositoryError {
        RepositoryError::condition_failed_with_context(
            format!("{:?} does not hold", condition),
            ErrorContext::new(operation)
                .with_entity(self.table_name.clone())
                .with_entity_id(key),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

#[async_trait]
impl ItemStore for LocalRepository {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn scan(&self) -> RepositoryResult<Vec<Item>> {
        Ok(self.items.read().values().cloned().collect())
    }

    async fn get(&self, key: &str) -> RepositoryResult<Option<Item>> {
        Ok(self.items.read().get(key).cloned())
    }

    async fn put(&self, item: Item, condition: Condition) -> RepositoryResult<()> {
        let key = item_key(&item)
            .ok_or_else(|| {
                RepositoryError::validation_with_context(
                    format!("item has no textual '{}' attribute", KEY_ATTRIBUTE),
                    ErrorContext::new("put").with_entity(self.table_name.clone()),
                )
            })?
            .to_string();

        let mut items = self.items.write();
        if !condition.holds(items.contains_key(&key)) {
            return Err(self.condition_failed("put", &key, condition));
        }
        debug!("put {} into {}", key, self.table_name);
        items.insert(key, item);
        Ok(())
    }

    async fn delete(&self, key: &str, condition: Condition) -> RepositoryResult<()> {
        let mut items = self.items.write();
        if !condition.holds(items.contains_key(key)) {
            return Err(self.condition_failed("delete", key, condition));
        }
        debug!("delete {} from {}", key, self.table_name);
        items.remove(key);
        Ok(())
    }

    async fn update(
        &self,
        key: &str,
        assignments: &FieldAssignments,
        condition: Condition,
    ) -> RepositoryResult<Item> {
        if assignments.touches(KEY_ATTRIBUTE) {
            return Err(RepositoryError::validation_with_context(
                format!("'{}' is the key attribute and cannot be updated", KEY_ATTRIBUTE),
                ErrorContext::new("update")
                    .with_entity(self.table_name.clone())
                    .with_entity_id(key),
            ));
        }

        let mut items = self.items.write();
        if !condition.holds(items.contains_key(key)) {
            return Err(self.condition_failed("update", key, condition));
        }

        let item = items.entry(key.to_string()).or_insert_with(|| {
            let mut fresh = Item::new();
            fresh.insert(KEY_ATTRIBUTE.to_string(), Value::String(key.to_string()));
            fresh
        });
        for (attribute, value) in assignments.iter() {
            item.insert(attribute.to_string(), value.clone());
        }
        debug!(
            "updated {} attribute(s) of {} in {}",
            assignments.len(),
            key,
            self.table_name
        );
        Ok(item.clone())
    }
}
