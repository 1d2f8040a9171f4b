//! Storefront domain types and logic.
//!
//! - **Catalog**: products, slug allocation, catalog management
//! - **Checkout**: pricing calculator, checkout form, orders, placement
//! - **Ledger**: normalization of loosely typed persisted orders
//! - **Admin**: order management, bulk operations, dashboard summary
//! - **Export**: CSV for orders and products
//!
//! # Example
//!
//! ```rust
//! use shop_commerce::prelude::*;
//!
//! let quote = OrderQuote::calculate(
//!     500.0,
//!     UnitSize::Half,
//!     3,
//!     DeliveryZone::Inside,
//!     &DeliveryFees::default(),
//! );
//! assert_eq!(quote.grand_total, 830.0);
//! assert_eq!(quote.grand_total_money(Currency::BDT).display(), "\u{09f3}830.00");
//!
//! assert_eq!(slugify("  Café Latte!! "), "cafe-latte");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validation;

pub mod admin;
pub mod batch;
pub mod catalog;
pub mod checkout;
pub mod export;
pub mod ledger;
pub mod report;

#[cfg(test)]
mod testing;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};
pub use validation::{FieldError, ValidationErrors};

/// Current time as Unix milliseconds, the unit `createdAt` is stored in.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::validation::ValidationErrors;

    // Catalog
    pub use crate::catalog::{
        slugify, CatalogService, Product, ProductDraft, ProductUpdate, SlugAllocator, SlugStatus,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutForm, CheckoutService, DeliveryFees, DeliveryZone, Order, OrderNotifier,
        OrderQuote, OrderStatus, UnitSize,
    };

    // Back office
    pub use crate::admin::OrderAdmin;
    pub use crate::batch::BatchResult;
    pub use crate::ledger::{LegacyOrder, NormalizedOrder, WeightSource};
    pub use crate::report::DashboardSummary;
}
