//! The document store collaborator.

use crate::{Document, Query, StoreError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Collection holding catalog products.
pub const PRODUCTS: &str = "products";
/// Collection holding customer orders.
pub const ORDERS: &str = "orders";

/// A hosted document database.
///
/// Every mutation is an independent, non-transactional call; the last write
/// wins. Implementations must be safe to share across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its generated id.
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<String, StoreError>;

    /// Fetch all documents matching a query.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge the given fields into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<(), StoreError>;

    /// Delete a document by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Typed convenience methods layered over any [`DocumentStore`].
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Serialize a record and insert it.
    async fn insert<T: Serialize + Sync>(&self, collection: &str, record: &T) -> Result<String, StoreError> {
        let fields = crate::document::to_fields(record)?;
        self.create(collection, fields).await
    }

    /// Query and deserialize every matching document.
    async fn query_as<T: DeserializeOwned + Send>(&self, collection: &str, query: &Query) -> Result<Vec<T>, StoreError> {
        self.query(collection, query)
            .await?
            .iter()
            .map(Document::deserialize)
            .collect()
    }

    /// Fetch and deserialize a single document.
    async fn get_as<T: DeserializeOwned + Send>(&self, collection: &str, id: &str) -> Result<Option<T>, StoreError> {
        match self.get(collection, id).await? {
            Some(doc) => Ok(Some(doc.deserialize()?)),
            None => Ok(None),
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
