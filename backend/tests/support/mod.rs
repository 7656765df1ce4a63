#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::Method;
use serde_json::{json, Value};

use review_api::api::{ApiRequest, ApiResponse};
use review_api::db::{
    Condition, FieldAssignments, Item, ItemStore, LocalRepository, RepositoryError,
    RepositoryResult,
};
use review_api::routes::ReviewHandler;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =========================================================================
// Fault injection
// =========================================================================

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Scan,
    Get,
    Put,
    Delete,
    Update,
}

/// In-memory store that records every call and fails the operations it is
/// told to with a connection error.
#[derive(Default)]
pub struct FailingStore {
    inner: LocalRepository,
    failing: Mutex<HashSet<StoreOp>>,
    calls: Mutex<Vec<StoreOp>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `op` call fail.
    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: StoreOp) -> usize {
        self.calls().into_iter().filter(|c| *c == op).count()
    }

    pub fn inner(&self) -> &LocalRepository {
        &self.inner
    }

    fn enter(&self, op: StoreOp) -> RepositoryResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(RepositoryError::connection(format!(
                "injected {:?} failure at 10.0.0.7:8000",
                op
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for FailingStore {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }

    async fn scan(&self) -> RepositoryResult<Vec<Item>> {
        self.enter(StoreOp::Scan)?;
        self.inner.scan().await
    }

    async fn get(&self, key: &str) -> RepositoryResult<Option<Item>> {
        self.enter(StoreOp::Get)?;
        self.inner.get(key).await
    }

    async fn put(&self, item: Item, condition: Condition) -> RepositoryResult<()> {
        self.enter(StoreOp::Put)?;
        self.inner.put(item, condition).await
    }

    async fn delete(&self, key: &str, condition: Condition) -> RepositoryResult<()> {
        self.enter(StoreOp::Delete)?;
        self.inner.delete(key, condition).await
    }

    async fn update(
        &self,
        key: &str,
        assignments: &FieldAssignments,
        condition: Condition,
    ) -> RepositoryResult<Item> {
        self.enter(StoreOp::Update)?;
        self.inner.update(key, assignments, condition).await
    }
}

// =========================================================================
// Request helpers
// =========================================================================

pub fn review_body(restaurant: &str, stars: u8, date: &str) -> Value {
    json!({"restaurant": restaurant, "stars": stars, "date": date})
}

pub fn local_handler() -> ReviewHandler {
    ReviewHandler::new(Arc::new(LocalRepository::default()))
}

pub async fn post(handler: &ReviewHandler, body: &Value) -> ApiResponse {
    handler
        .handle(ApiRequest::new(Method::POST, "/").with_json(body))
        .await
}

pub async fn get(handler: &ReviewHandler, id: &str) -> ApiResponse {
    handler
        .handle(ApiRequest::new(Method::GET, format!("/{}", id)))
        .await
}

pub async fn list(handler: &ReviewHandler) -> ApiResponse {
    handler.handle(ApiRequest::new(Method::GET, "/")).await
}

pub async fn delete(handler: &ReviewHandler, id: &str) -> ApiResponse {
    handler
        .handle(ApiRequest::new(Method::DELETE, format!("/{}", id)))
        .await
}

pub async fn patch(handler: &ReviewHandler, id: &str, body: &Value) -> ApiResponse {
    handler
        .handle(ApiRequest::new(Method::PATCH, format!("/{}", id)).with_json(body))
        .await
}

/// Identifier of the review in a successful response.
pub fn id_of(response: &ApiResponse) -> String {
    response.data_payload().expect("data payload")["id"]
        .as_str()
        .expect("string id")
        .to_string()
}
