//! Catalog module.
//!
//! Products, slug allocation and the service that manages both.

mod product;
mod service;
mod slug;

pub use product::{Product, ProductDraft, ProductUpdate};
pub use service::CatalogService;
pub use slug::{
    slugify, SlugAllocator, SlugCheckGate, SlugField, SlugStatus, SlugTicket, MAX_SLUG_ATTEMPTS,
};
