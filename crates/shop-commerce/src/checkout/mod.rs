//! Checkout module.
//!
//! Contains the pricing calculator, checkout form, orders, and the
//! service that places them.

mod form;
mod notify;
mod order;
mod pricing;
mod service;

pub use form::{CheckoutForm, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
pub use notify::{NoopNotifier, OrderNotifier};
pub use order::{Order, OrderStatus};
pub use pricing::{DeliveryFees, DeliveryZone, OrderQuote, UnitSize};
pub use service::CheckoutService;
