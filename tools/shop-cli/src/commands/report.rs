//! Dashboard summary.

use anyhow::Result;
use shop_commerce::Money;

use crate::context::Context;

pub async fn run(ctx: &Context) -> Result<()> {
    let admin = ctx.admin(ctx.store().await?);
    let summary = admin.summary().await?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    let currency = ctx.config.currency()?;
    ctx.output.header("Dashboard");
    ctx.output.kv("products", &summary.product_count.to_string());
    ctx.output.kv(
        "orders",
        &format!(
            "{} ({} pending, {} confirmed)",
            summary.total_orders, summary.pending_orders, summary.confirmed_orders
        ),
    );
    ctx.output.kv("revenue", &summary.revenue_money(currency).display());
    ctx.output.kv(
        "confirmed revenue",
        &Money::new(summary.confirmed_revenue, currency).display(),
    );
    ctx.output.kv(
        "average order",
        &Money::new(summary.average_order_value(), currency).display(),
    );
    ctx.output.kv("weight shipped", &format!("{:.2} kg", summary.total_weight));
    Ok(())
}
