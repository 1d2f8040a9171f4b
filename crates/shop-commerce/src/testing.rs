//! Store doubles shared by unit tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use shop_store::{Document, DocumentStore, InMemoryStore, Query, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};

fn offline() -> StoreError {
    StoreError::Backend("offline".to_string())
}

/// A store whose every call fails.
pub struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn create(&self, _: &str, _: Map<String, Value>) -> Result<String, StoreError> {
        Err(offline())
    }
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>, StoreError> {
        Err(offline())
    }
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(offline())
    }
    async fn update(&self, _: &str, _: &str, _: Map<String, Value>) -> Result<(), StoreError> {
        Err(offline())
    }
    async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
        Err(offline())
    }
}

/// Wraps an in-memory store, counts queries, and fails mutations on ids
/// listed in `fail_ids`.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_ids: Vec<String>,
    pub queries: AtomicUsize,
}

impl FlakyStore {
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check(&self, id: &str) -> Result<(), StoreError> {
        if self.fail_ids.iter().any(|f| f == id) {
            Err(offline())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<String, StoreError> {
        self.inner.create(collection, fields).await
    }
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(collection, query).await
    }
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.check(id)?;
        self.inner.update(collection, id, fields).await
    }
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check(id)?;
        self.inner.delete(collection, id).await
    }
}
