//! Order pricing and weight calculation.
//!
//! Prices are quoted per reference unit (one kilogram). A customer picks a
//! unit size that is a fraction of it, a quantity, and a delivery zone with
//! a fixed fee.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Pack size offered for each product, as a fraction of the reference unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSize {
    /// Half a kilogram.
    Half,
    /// One kilogram.
    #[default]
    Whole,
}

impl UnitSize {
    /// Fraction of the reference unit.
    pub fn fraction(&self) -> f64 {
        match self {
            UnitSize::Half => 0.5,
            UnitSize::Whole => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSize::Half => "half",
            UnitSize::Whole => "whole",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitSize::Half => "500 g",
            UnitSize::Whole => "1 kg",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "half" | "0.5" | "500g" => Some(UnitSize::Half),
            "whole" | "1" | "1kg" => Some(UnitSize::Whole),
            _ => None,
        }
    }
}

/// Coarse customer location used to pick the delivery fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryZone {
    #[default]
    Inside,
    Outside,
}

impl DeliveryZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryZone::Inside => "inside",
            DeliveryZone::Outside => "outside",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryZone::Inside => "Inside city",
            DeliveryZone::Outside => "Outside city",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inside" => Some(DeliveryZone::Inside),
            "outside" => Some(DeliveryZone::Outside),
            _ => None,
        }
    }
}

/// Fixed delivery fee per zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFees {
    pub inside: f64,
    pub outside: f64,
}

impl DeliveryFees {
    pub const DEFAULT_INSIDE: f64 = 80.0;
    pub const DEFAULT_OUTSIDE: f64 = 120.0;

    pub fn fee(&self, zone: DeliveryZone) -> f64 {
        match zone {
            DeliveryZone::Inside => self.inside,
            DeliveryZone::Outside => self.outside,
        }
    }
}

impl Default for DeliveryFees {
    fn default() -> Self {
        Self {
            inside: Self::DEFAULT_INSIDE,
            outside: Self::DEFAULT_OUTSIDE,
        }
    }
}

/// Everything the checkout shows and persists about an order's cost.
///
/// Invariants: `items_total == unit_price * quantity` and
/// `grand_total == items_total + delivery_fee`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderQuote {
    pub unit_price: f64,
    pub quantity: u32,
    pub items_total: f64,
    pub delivery_fee: f64,
    pub grand_total: f64,
    /// Total weight in kilograms.
    pub total_weight: f64,
}

impl OrderQuote {
    /// Price an order.
    ///
    /// `quantity` must already be validated as at least 1.
    ///
    /// ```
    /// use shop_commerce::checkout::{DeliveryFees, DeliveryZone, OrderQuote, UnitSize};
    ///
    /// let quote = OrderQuote::calculate(500.0, UnitSize::Half, 3, DeliveryZone::Inside, &DeliveryFees::default());
    /// assert_eq!(quote.unit_price, 250.0);
    /// assert_eq!(quote.grand_total, 830.0);
    /// ```
    pub fn calculate(
        price_per_unit: f64,
        unit: UnitSize,
        quantity: u32,
        zone: DeliveryZone,
        fees: &DeliveryFees,
    ) -> Self {
        let fraction = unit.fraction();
        let unit_price = price_per_unit * fraction;
        let items_total = unit_price * f64::from(quantity);
        let delivery_fee = fees.fee(zone);

        Self {
            unit_price,
            quantity,
            items_total,
            delivery_fee,
            grand_total: items_total + delivery_fee,
            total_weight: fraction * f64::from(quantity),
        }
    }

    pub fn unit_price_money(&self, currency: Currency) -> Money {
        Money::new(self.unit_price, currency)
    }

    pub fn items_total_money(&self, currency: Currency) -> Money {
        Money::new(self.items_total, currency)
    }

    pub fn delivery_fee_money(&self, currency: Currency) -> Money {
        Money::new(self.delivery_fee, currency)
    }

    pub fn grand_total_money(&self, currency: Currency) -> Money {
        Money::new(self.grand_total, currency)
    }
}
