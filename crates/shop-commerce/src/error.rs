//! Commerce error types.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Form input rejected before reaching the store.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Requested slug is already attached to another product.
    #[error("Slug already taken: {0}")]
    SlugTaken(String),

    /// Order status change not allowed.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Persistence collaborator failed.
    #[error("Store error: {0}")]
    Store(#[from] shop_store::StoreError),
}

impl CommerceError {
    /// Check if the error was caused by user input rather than a collaborator.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CommerceError::Validation(_)
                | CommerceError::SlugTaken(_)
                | CommerceError::InvalidStatusTransition { .. }
        )
    }
}

impl From<ValidationErrors> for CommerceError {
    fn from(e: ValidationErrors) -> Self {
        CommerceError::Validation(e)
    }
}
