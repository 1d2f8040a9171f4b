//! Price an order without placing it.

use anyhow::{Context as _, Result};
use serde_json::json;
use shop_commerce::checkout::{DeliveryZone, OrderQuote, UnitSize};

use super::QuoteArgs;
use crate::context::Context;

pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let unit = parse_unit(&args.unit)?;
    let zone = parse_zone(&args.zone)?;
    let currency = ctx.config.currency()?;

    let (title, price) = match &args.product {
        Some(key) => {
            let catalog = ctx.catalog(ctx.store().await?);
            let product = catalog.resolve(key).await?;
            (Some(product.title), product.price)
        }
        None => (None, args.price.context("--price is required")?),
    };

    let quote = OrderQuote::calculate(price, unit, args.quantity, zone, &ctx.config.fees());

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product": title,
            "unitPrice": quote.unit_price,
            "quantity": quote.quantity,
            "itemsTotal": quote.items_total,
            "deliveryFee": quote.delivery_fee,
            "grandTotal": quote.grand_total,
            "totalWeight": quote.total_weight,
        }));
        return Ok(());
    }

    ctx.output.header(title.as_deref().unwrap_or("Quote"));
    ctx.output.kv(
        "unit price",
        &format!("{} ({})", quote.unit_price_money(currency), unit.label()),
    );
    ctx.output.kv("quantity", &quote.quantity.to_string());
    ctx.output.kv("items", &quote.items_total_money(currency).to_string());
    ctx.output.kv(
        "delivery",
        &format!("{} ({})", quote.delivery_fee_money(currency), zone.label()),
    );
    ctx.output.kv("total", &quote.grand_total_money(currency).to_string());
    ctx.output.kv("weight", &format!("{} kg", quote.total_weight));
    Ok(())
}

pub fn parse_unit(s: &str) -> Result<UnitSize> {
    UnitSize::from_str(s).with_context(|| format!("Unknown unit size '{s}' (expected half or whole)"))
}

pub fn parse_zone(s: &str) -> Result<DeliveryZone> {
    DeliveryZone::from_str(s).with_context(|| format!("Unknown delivery zone '{s}' (expected inside or outside)"))
}
