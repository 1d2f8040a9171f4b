//! In-process document store with optional JSON snapshot persistence.

use crate::document::ID_FIELD;
use crate::{Document, DocumentStore, Query, StoreError};
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Length of generated document ids.
const ID_LENGTH: usize = 20;

type Collections = BTreeMap<String, Vec<Document>>;

/// A document store kept in memory.
///
/// When opened with [`InMemoryStore::open`], every successful mutation is
/// written back to a JSON snapshot file of the form
/// `{ "<collection>": [ { "id": ..., ...fields } ] }`. A mutation whose
/// snapshot write fails leaves the in-memory state untouched.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
    snapshot: Option<PathBuf>,
}

impl InMemoryStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a snapshot-backed store, loading the file if it exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => parse_snapshot(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), "opened document snapshot");
        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(path),
        })
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    async fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let mut root = Map::new();
        for (name, docs) in collections {
            root.insert(
                name.clone(),
                Value::Array(docs.iter().map(Document::to_value).collect()),
            );
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Persist `next`, then make it the live state.
    async fn commit(&self, current: &mut Collections, next: Collections) -> Result<(), StoreError> {
        self.persist(&next).await?;
        *current = next;
        Ok(())
    }
}

fn parse_snapshot(bytes: &[u8]) -> Result<Collections, StoreError> {
    let root: Map<String, Value> = serde_json::from_slice(bytes)?;
    let mut collections = Collections::new();
    for (name, docs) in root {
        let Value::Array(items) = docs else {
            return Err(StoreError::Backend(format!(
                "snapshot collection {name} is not an array"
            )));
        };
        let mut parsed = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(mut fields) = item else {
                return Err(StoreError::Backend(format!(
                    "snapshot entry in {name} is not an object"
                )));
            };
            let id = match fields.remove(ID_FIELD) {
                Some(Value::String(id)) => id,
                _ => generate_id(),
            };
            parsed.push(Document::new(id, fields));
        }
        collections.insert(name, parsed);
    }
    Ok(collections)
}

/// Generate a random alphanumeric document id.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(&self, collection: &str, mut fields: Map<String, Value>) -> Result<String, StoreError> {
        let mut collections = self.collections.write().await;
        let id = generate_id();
        fields.remove(ID_FIELD);
        let mut next = collections.clone();
        next.entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        self.commit(&mut collections, next).await?;
        tracing::debug!(collection, id = %id, "document created");
        Ok(id)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| query.apply(docs))
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        let doc = next
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            if key != ID_FIELD {
                doc.fields.insert(key, value);
            }
        }
        self.commit(&mut collections, next).await?;
        tracing::debug!(collection, id, "document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        let docs = next.get_mut(collection).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.commit(&mut collections, next).await?;
        tracing::debug!(collection, id, "document deleted");
        Ok(())
    }
}
