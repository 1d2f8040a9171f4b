//! Normalization of persisted order records for reporting.
//!
//! Orders written by older storefront versions may be missing fields or
//! store weights in inconsistent units. [`LegacyOrder`] reads whatever is
//! present without failing, and [`NormalizedOrder`] is the fully resolved
//! shape the rest of the crate reports on.
//!
//! Weight resolution stops at the first rule that applies:
//!
//! 1. `unitKg`: per-item weight in kilograms.
//! 2. `unitWeight`: ambiguous unit. Values below 10 are kilograms, values
//!    of 10 or more are grams.
//! 3. `weightLabel`: free text such as `"500g"`, `"1.5 kg"` or `"2"`.
//!    A bare number uses the same threshold as rule 2.
//! 4. One kilogram per item.
//!
//! Every rule multiplies by the quantity.

use crate::checkout::{DeliveryZone, OrderStatus, UnitSize};
use serde::Serialize;
use serde_json::{Map, Value};
use shop_store::Document;

/// Unit weights at or above this are taken to be grams.
pub const GRAMS_THRESHOLD: f64 = 10.0;

const GRAMS_PER_KG: f64 = 1000.0;

/// Which rule produced an order's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightSource {
    UnitKg,
    UnitWeight,
    WeightLabel,
    Assumed,
}

/// An order record as found in the store, every field optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyOrder {
    pub id: String,
    pub product_id: Option<String>,
    pub product_title: Option<String>,
    pub quantity: Option<f64>,
    pub unit_size: Option<UnitSize>,
    pub unit_kg: Option<f64>,
    pub unit_weight: Option<f64>,
    pub weight_label: Option<String>,
    pub unit_price: Option<f64>,
    pub items_total: Option<f64>,
    pub delivery_zone: Option<DeliveryZone>,
    pub delivery_fee: Option<f64>,
    pub grand_total: Option<f64>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<i64>,
}

impl LegacyOrder {
    pub fn from_document(doc: &Document) -> Self {
        Self::from_fields(&doc.id, &doc.fields)
    }

    /// Read known fields, ignoring anything with an unusable type.
    pub fn from_fields(id: &str, fields: &Map<String, Value>) -> Self {
        let num = |name: &str| fields.get(name).and_then(coerce_f64);
        let text = |name: &str| fields.get(name).and_then(coerce_string);

        Self {
            id: id.to_string(),
            product_id: text("productId"),
            product_title: text("productTitle"),
            quantity: num("quantity"),
            unit_size: text("unitSize").as_deref().and_then(UnitSize::from_str),
            unit_kg: num("unitKg"),
            unit_weight: num("unitWeight"),
            weight_label: text("weightLabel"),
            unit_price: num("unitPrice"),
            items_total: num("itemsTotal"),
            delivery_zone: text("deliveryZone").as_deref().and_then(DeliveryZone::from_str),
            delivery_fee: num("deliveryFee"),
            grand_total: num("grandTotal"),
            customer_name: text("customerName"),
            phone: text("phone"),
            address: text("address"),
            status: text("status"),
            created_at: fields.get("createdAt").and_then(coerce_millis),
        }
    }

    /// Whole items ordered. Missing or unusable quantities count as zero.
    pub fn quantity(&self) -> u32 {
        match self.quantity {
            Some(q) if q >= 1.0 => q.trunc().min(f64::from(u32::MAX)) as u32,
            _ => 0,
        }
    }

    /// Total weight in kilograms and the rule that produced it.
    pub fn resolve_weight(&self) -> (f64, WeightSource) {
        let quantity = f64::from(self.quantity());

        if let Some(kg) = self.unit_kg {
            return (kg * quantity, WeightSource::UnitKg);
        }
        if let Some(w) = self.unit_weight {
            return (ambiguous_to_kg(w) * quantity, WeightSource::UnitWeight);
        }
        if let Some(kg) = self.weight_label.as_deref().and_then(parse_weight_label) {
            return (kg * quantity, WeightSource::WeightLabel);
        }
        (quantity, WeightSource::Assumed)
    }

    /// Grand total, preferring stored totals over recomputation.
    pub fn resolve_grand_total(&self) -> f64 {
        let fee = self.delivery_fee.unwrap_or(0.0);
        if let Some(total) = self.grand_total {
            return total;
        }
        if let Some(items) = self.items_total {
            return items + fee;
        }
        if let Some(unit) = self.unit_price {
            return unit * f64::from(self.quantity()) + fee;
        }
        0.0
    }

    /// Unrecognized statuses read as pending.
    pub fn status(&self) -> OrderStatus {
        self.status
            .as_deref()
            .and_then(OrderStatus::from_str)
            .unwrap_or_default()
    }

    pub fn normalize(&self) -> NormalizedOrder {
        let (total_weight, weight_source) = self.resolve_weight();
        NormalizedOrder {
            id: self.id.clone(),
            product_id: self.product_id.clone().unwrap_or_default(),
            product_title: self.product_title.clone().unwrap_or_default(),
            quantity: self.quantity(),
            unit_size: self.unit_size,
            delivery_zone: self.delivery_zone,
            total_weight,
            weight_source,
            grand_total: self.resolve_grand_total(),
            customer_name: self.customer_name.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            status: self.status(),
            created_at: self.created_at.unwrap_or(0),
        }
    }
}

/// An order with every reported value resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    pub id: String,
    pub product_id: String,
    pub product_title: String,
    pub quantity: u32,
    pub unit_size: Option<UnitSize>,
    pub delivery_zone: Option<DeliveryZone>,
    /// Kilograms.
    pub total_weight: f64,
    pub weight_source: WeightSource,
    pub grand_total: f64,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl From<&Document> for NormalizedOrder {
    fn from(doc: &Document) -> Self {
        LegacyOrder::from_document(doc).normalize()
    }
}

fn ambiguous_to_kg(value: f64) -> f64 {
    if value < GRAMS_THRESHOLD {
        value
    } else {
        value / GRAMS_PER_KG
    }
}

/// Parse `<number>(kg|g)?` into kilograms. Case and surrounding spaces
/// are ignored.
pub fn parse_weight_label(label: &str) -> Option<f64> {
    let label = label.trim().to_ascii_lowercase();
    let split = label
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(label.len());
    let (number, unit) = label.split_at(split);
    let value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;

    match unit.trim() {
        "kg" => Some(value),
        "g" => Some(value / GRAMS_PER_KG),
        "" => Some(ambiguous_to_kg(value)),
        _ => None,
    }
}

pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub(crate) fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Milliseconds from a number, numeric string or `{seconds, nanoseconds}`
/// timestamp object.
pub(crate) fn coerce_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Object(obj) => {
            let seconds = obj.get("seconds").and_then(coerce_f64)?;
            let nanos = obj.get("nanoseconds").and_then(coerce_f64).unwrap_or(0.0);
            Some((seconds * 1000.0 + nanos / 1_000_000.0) as i64)
        }
        other => coerce_f64(other).map(|n| n as i64),
    }
}

/// `deserialize_with` adapters applying the same coercions to typed records.
///
/// Unreadable values fall back to the field default instead of failing the
/// whole document.
pub(crate) mod lenient {
    use super::{coerce_f64, coerce_millis, coerce_string};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_f64(&value).unwrap_or(0.0))
    }

    pub fn option_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_f64(&value))
    }

    pub fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_millis(&value).unwrap_or(0))
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_string(&value).unwrap_or_default())
    }

    pub fn option_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_string(&value))
    }

    /// A list of strings, or a single string; other entries are skipped.
    pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .collect(),
            Value::String(s) if !s.trim().is_empty() => vec![s],
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy(value: Value) -> LegacyOrder {
        match value {
            Value::Object(map) => LegacyOrder::from_fields("o1", &map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_unit_weight_in_grams() {
        let order = legacy(json!({"quantity": 4, "unitWeight": 500}));
        assert_eq!(order.resolve_weight(), (2.0, WeightSource::UnitWeight));
    }

    #[test]
    fn test_weight_label_in_grams() {
        let order = legacy(json!({"quantity": 4, "weightLabel": "250g"}));
        assert_eq!(order.resolve_weight(), (1.0, WeightSource::WeightLabel));
    }

    #[test]
    fn test_threshold_boundary() {
        let (below, _) = legacy(json!({"quantity": 1, "unitWeight": 9.99})).resolve_weight();
        let (at, _) = legacy(json!({"quantity": 1, "unitWeight": 10})).resolve_weight();
        assert_eq!(below, 9.99);
        assert_eq!(at, 0.01);
    }

    #[test]
    fn test_unit_kg_beats_unit_weight() {
        let order = legacy(json!({
            "quantity": 2,
            "unitKg": 0.5,
            "unitWeight": 750,
            "weightLabel": "3kg"
        }));
        assert_eq!(order.resolve_weight(), (1.0, WeightSource::UnitKg));
    }

    #[test]
    fn test_unparseable_fields_fall_through() {
        let order = legacy(json!({
            "quantity": "3",
            "unitKg": "heavy",
            "unitWeight": null,
            "weightLabel": "about a kilo"
        }));
        assert_eq!(order.resolve_weight(), (3.0, WeightSource::Assumed));
    }

    #[test]
    fn test_missing_quantity_degrades_to_zero() {
        let order = legacy(json!({"quantity": "lots", "unitKg": 1.0}));
        assert_eq!(order.quantity(), 0);
        assert_eq!(order.resolve_weight().0, 0.0);
    }

    #[test]
    fn test_parse_weight_label() {
        assert_eq!(parse_weight_label("1.5 KG"), Some(1.5));
        assert_eq!(parse_weight_label(" 500 g "), Some(0.5));
        assert_eq!(parse_weight_label("2"), Some(2.0));
        assert_eq!(parse_weight_label("250"), Some(0.25));
        assert_eq!(parse_weight_label("kg"), None);
        assert_eq!(parse_weight_label("5 lb"), None);
    }

    #[test]
    fn test_grand_total_fallback_chain() {
        let stored = legacy(json!({"grandTotal": 830, "itemsTotal": 1, "deliveryFee": 1}));
        assert_eq!(stored.resolve_grand_total(), 830.0);

        let from_items = legacy(json!({"itemsTotal": "750", "deliveryFee": 80}));
        assert_eq!(from_items.resolve_grand_total(), 830.0);

        let from_unit = legacy(json!({"unitPrice": 250, "quantity": 3, "deliveryFee": 80}));
        assert_eq!(from_unit.resolve_grand_total(), 830.0);

        let nothing = legacy(json!({"deliveryFee": 80}));
        assert_eq!(nothing.resolve_grand_total(), 0.0);
    }

    #[test]
    fn test_normalize() {
        let order = legacy(json!({
            "productTitle": "Honey",
            "quantity": 3,
            "unitSize": "half",
            "unitKg": 0.5,
            "deliveryZone": "inside",
            "grandTotal": 830,
            "status": "Confirmed",
            "createdAt": {"seconds": 1700000000, "nanoseconds": 500000000}
        }));
        let normalized = order.normalize();

        assert_eq!(normalized.total_weight, 1.5);
        assert_eq!(normalized.unit_size, Some(UnitSize::Half));
        assert_eq!(normalized.delivery_zone, Some(DeliveryZone::Inside));
        assert_eq!(normalized.status, OrderStatus::Confirmed);
        assert_eq!(normalized.created_at, 1_700_000_000_500);
        assert_eq!(normalized.customer_name, "");
    }

    #[test]
    fn test_unknown_status_is_pending() {
        assert_eq!(legacy(json!({"status": "shipped"})).status(), OrderStatus::Pending);
        assert_eq!(legacy(json!({})).status(), OrderStatus::Pending);
    }
}
