//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document with the given id exists in the collection.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The backend rejected or failed the operation.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The caller is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if this error means the document is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
