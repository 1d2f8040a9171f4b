//! Document store collaborator for the storefront.
//!
//! The storefront persists products and orders in a hosted document
//! database. This crate models that collaborator as the [`DocumentStore`]
//! trait, with a small query model (equality filters, ordering, limits)
//! and an in-process backend that can snapshot to a JSON file.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_store::{DocumentStoreExt, InMemoryStore, Query, PRODUCTS};
//!
//! let store = InMemoryStore::open("shop-data.json").await?;
//! let newest: Vec<Product> = store
//!     .query_as(PRODUCTS, &Query::new().order_by_desc("createdAt").limit(10))
//!     .await?;
//! ```

mod document;
mod error;
mod memory;
mod query;
mod store;

pub use document::{to_fields, Document, ID_FIELD};
pub use error::StoreError;
pub use memory::{generate_id, InMemoryStore};
pub use query::{Direction, Filter, Query};
pub use store::{DocumentStore, DocumentStoreExt, ORDERS, PRODUCTS};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Document, DocumentStore, DocumentStoreExt, Query, StoreError};
}
