//! CSV export of orders and products.
//!
//! Every field is wrapped in double quotes and embedded quotes are
//! doubled, so the output opens cleanly in spreadsheet tools regardless of
//! commas or line breaks in customer addresses.

use crate::catalog::Product;
use crate::ledger::NormalizedOrder;
use chrono::{TimeZone, Utc};

pub const ORDER_COLUMNS: [&str; 13] = [
    "Order ID",
    "Date",
    "Product",
    "Quantity",
    "Unit Size",
    "Total Weight (kg)",
    "Delivery Zone",
    "Grand Total",
    "Customer",
    "Phone",
    "Address",
    "Status",
    "Product ID",
];

pub const PRODUCT_COLUMNS: [&str; 8] = [
    "Product ID",
    "Title",
    "Slug",
    "Price",
    "Original Price",
    "Category",
    "Images",
    "Created",
];

/// Quote one CSV field.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = fields.into_iter().map(|f| quote_field(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

fn format_millis(millis: i64) -> String {
    if millis <= 0 {
        return String::new();
    }
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn orders_csv(orders: &[NormalizedOrder]) -> String {
    let mut out = String::new();
    push_row(&mut out, ORDER_COLUMNS);
    for order in orders {
        push_row(
            &mut out,
            [
                order.id.clone(),
                format_millis(order.created_at),
                order.product_title.clone(),
                order.quantity.to_string(),
                order.unit_size.map(|u| u.label().to_string()).unwrap_or_default(),
                format!("{}", order.total_weight),
                order.delivery_zone.map(|z| z.label().to_string()).unwrap_or_default(),
                format_amount(order.grand_total),
                order.customer_name.clone(),
                order.phone.clone(),
                order.address.clone(),
                order.status.display_name().to_string(),
                order.product_id.clone(),
            ],
        );
    }
    out
}

pub fn products_csv(products: &[Product]) -> String {
    let mut out = String::new();
    push_row(&mut out, PRODUCT_COLUMNS);
    for product in products {
        push_row(
            &mut out,
            [
                product.id.to_string(),
                product.title.clone(),
                product.slug.clone().unwrap_or_default(),
                format_amount(product.price),
                product.original_price.map(format_amount).unwrap_or_default(),
                product.category.clone().unwrap_or_default(),
                product.images.join(" "),
                format_millis(product.created_at),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LegacyOrder;
    use serde_json::json;

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "\"plain\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field(""), "\"\"");
    }

    #[test]
    fn test_orders_csv() {
        let fields = match json!({
            "productTitle": "Honey",
            "quantity": 3,
            "unitKg": 0.5,
            "grandTotal": 830,
            "customerName": "Rahim \"Ra\"",
            "address": "House 4, Road 2",
            "createdAt": 0
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let order = LegacyOrder::from_fields("o1", &fields).normalize();
        let csv = orders_csv(&[order]);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Order ID\",\"Date\""));
        assert!(lines[1].starts_with("\"o1\",\"\",\"Honey\",\"3\""));
        assert!(lines[1].contains("\"830.00\""));
        assert!(lines[1].contains("\"Rahim \"\"Ra\"\"\""));
        assert!(lines[1].contains("\"House 4, Road 2\""));
        assert!(lines[1].contains("\"Pending\""));
    }

    #[test]
    fn test_products_csv() {
        let mut product = Product::new("Ghee", 1200.0);
        product.slug = Some("ghee".into());
        product.original_price = Some(1400.0);
        product.created_at = 1_700_000_000_000;

        let csv = products_csv(&[product]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"ghee\",\"1200.00\",\"1400.00\",\"\""));
        assert!(row.ends_with("\"2023-11-14 22:13\""));
    }
}
