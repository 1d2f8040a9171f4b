//! Order types.

use crate::catalog::Product;
use crate::checkout::{CheckoutForm, DeliveryZone, OrderQuote, UnitSize};
use crate::ids::{OrderId, ProductId};
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders start `Pending` and may only move to `Confirmed`; the only other
/// way out is deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Order confirmed by an admin.
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            _ => None,
        }
    }

    /// Check whether moving to `next` is allowed. Staying put is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, _) | (OrderStatus::Confirmed, OrderStatus::Confirmed)
        )
    }

    /// Validate a transition.
    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, CommerceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

/// A placed order.
///
/// Product title and price are copied at checkout so later product edits
/// never change historical orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: OrderId,
    pub product_id: ProductId,
    /// Product title at time of order.
    pub product_title: String,
    /// Price per kilogram at time of order.
    pub price_per_unit: f64,
    pub quantity: u32,
    pub unit_size: UnitSize,
    /// Weight of one item in kilograms.
    pub unit_kg: f64,
    pub unit_price: f64,
    pub items_total: f64,
    pub delivery_zone: DeliveryZone,
    pub delivery_fee: f64,
    pub grand_total: f64,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub status: OrderStatus,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl Order {
    /// Snapshot a product and a priced, validated form into a new order.
    pub fn place(product: &Product, form: &CheckoutForm, quote: &OrderQuote) -> Self {
        Self {
            id: OrderId::unassigned(),
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            price_per_unit: product.price,
            quantity: quote.quantity,
            unit_size: form.unit_size,
            unit_kg: form.unit_size.fraction(),
            unit_price: quote.unit_price,
            items_total: quote.items_total,
            delivery_zone: form.delivery_zone,
            delivery_fee: quote.delivery_fee,
            grand_total: quote.grand_total,
            customer_name: form.customer_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            status: OrderStatus::Pending,
            created_at: crate::now_millis(),
        }
    }

    /// Total weight in kilograms.
    pub fn total_weight(&self) -> f64 {
        self.unit_kg * f64::from(self.quantity)
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::DeliveryFees;

    fn sample_product() -> Product {
        let mut product = Product::new("Raw Honey", 500.0);
        product.id = ProductId::new("p-honey");
        product
    }

    fn sample_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: " Rahim ".to_string(),
            phone: "01712345678".to_string(),
            address: "House 4, Road 2".to_string(),
            quantity: 3,
            unit_size: UnitSize::Half,
            delivery_zone: DeliveryZone::Inside,
        }
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Confirmed
            .transition_to(OrderStatus::Pending)
            .is_err());
    }

    #[test]
    fn test_place_snapshots_product() {
        let product = sample_product();
        let form = sample_form();
        let quote = OrderQuote::calculate(
            product.price,
            form.unit_size,
            form.quantity,
            form.delivery_zone,
            &DeliveryFees::default(),
        );
        let order = Order::place(&product, &form, &quote);

        assert!(!order.id.is_assigned());
        assert_eq!(order.product_title, "Raw Honey");
        assert_eq!(order.price_per_unit, 500.0);
        assert_eq!(order.grand_total, 830.0);
        assert_eq!(order.grand_total, order.items_total + order.delivery_fee);
        assert_eq!(order.customer_name, "Rahim");
        assert_eq!(order.total_weight(), 1.5);
        assert!(order.is_pending());
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let product = sample_product();
        let form = sample_form();
        let quote = OrderQuote::calculate(500.0, form.unit_size, 3, form.delivery_zone, &DeliveryFees::default());
        let value = serde_json::to_value(Order::place(&product, &form, &quote)).unwrap();

        assert_eq!(value["grandTotal"], 830.0);
        assert_eq!(value["unitKg"], 0.5);
        assert_eq!(value["status"], "pending");
        assert_eq!(value["deliveryZone"], "inside");
    }
}
