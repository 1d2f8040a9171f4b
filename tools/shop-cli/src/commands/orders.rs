//! Order commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use shop_commerce::checkout::{CheckoutForm, OrderStatus};
use shop_commerce::export::orders_csv;

use super::products::write_export;
use super::quote::{parse_unit, parse_zone};
use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_date, status_badge};

pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store().await?;
    let admin = ctx.admin(store.clone());

    match args.command {
        OrdersCommand::List { limit, status } => {
            let filter = match status.as_deref() {
                Some(s) => Some(
                    OrderStatus::from_str(s).with_context(|| format!("Unknown status '{s}'"))?,
                ),
                None => None,
            };
            let orders = match filter {
                Some(status) => admin.list_by_status(status, limit).await?,
                None => admin.list(limit).await?,
            };

            if ctx.output.is_json() {
                ctx.output.json(&orders);
                return Ok(());
            }
            if orders.is_empty() {
                ctx.output.info("No orders");
                return Ok(());
            }

            let currency = ctx.config.currency()?;
            let widths = [20, 16, 22, 4, 8, 12, 18, 10];
            ctx.output.header(&format!("{} order(s)", orders.len()));
            ctx.output.table_row(
                &["ID", "DATE", "PRODUCT", "QTY", "KG", "TOTAL", "CUSTOMER", "STATUS"],
                &widths,
            );
            for order in &orders {
                ctx.output.table_row(
                    &[
                        &order.id,
                        &format_date(order.created_at),
                        &order.product_title,
                        &order.quantity.to_string(),
                        &format!("{}", order.total_weight),
                        &shop_commerce::Money::new(order.grand_total, currency).display(),
                        &order.customer_name,
                        &status_badge(order.status.as_str()),
                    ],
                    &widths,
                );
            }
            Ok(())
        }
        OrdersCommand::Place {
            product,
            name,
            phone,
            address,
            quantity,
            unit,
            zone,
        } => {
            let form = CheckoutForm {
                customer_name: name,
                phone,
                address,
                quantity,
                unit_size: parse_unit(&unit)?,
                delivery_zone: parse_zone(&zone)?,
            };
            let product = ctx.catalog(store.clone()).resolve(&product).await?;
            let (checkout, webhook) = ctx.checkout(store)?;

            let order = checkout.place_order(&product, &form).await?;

            if let Some(handle) = webhook.as_ref().and_then(|w| w.dispatch(&order)) {
                let wait = ctx.config.webhook.timeout();
                let spinner = ctx.output.spinner("Notifying webhook...");
                let finished = tokio::time::timeout(wait, handle).await.is_ok();
                spinner.finish_and_clear();
                if !finished {
                    ctx.output.debug("Webhook still pending at exit");
                }
            }

            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                let currency = ctx.config.currency()?;
                ctx.output.success(&format!("Placed order {}", order.id));
                ctx.output.kv("product", &order.product_title);
                ctx.output.kv(
                    "items",
                    &format!("{} x {}", order.quantity, order.unit_size.label()),
                );
                ctx.output.kv(
                    "total",
                    &shop_commerce::Money::new(order.grand_total, currency).display(),
                );
            }
            Ok(())
        }
        OrdersCommand::Confirm { ids } => {
            ctx.require_admin().await?;
            let result = admin.confirm_many(&ids).await;
            ctx.output.batch("Confirmed", &result);
            if let Some(summary) = result.failure_summary() {
                bail!(summary);
            }
            Ok(())
        }
        OrdersCommand::Delete { ids, yes } => {
            ctx.require_admin().await?;
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete {} order(s)?", ids.len()))
                    .default(false)
                    .interact()?
            {
                ctx.output.info("Cancelled");
                return Ok(());
            }
            let result = admin.delete_many(&ids).await;
            ctx.output.batch("Deleted", &result);
            if let Some(summary) = result.failure_summary() {
                bail!(summary);
            }
            Ok(())
        }
        OrdersCommand::Export { output } => {
            let csv = orders_csv(&admin.list(None).await?);
            write_export(output.as_deref(), &csv, ctx)
        }
    }
}
