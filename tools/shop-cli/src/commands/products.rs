//! Catalog management commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use shop_commerce::catalog::{CatalogService, Product, ProductDraft, ProductUpdate};
use shop_commerce::export::products_csv;
use shop_commerce::ProductId;

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::format_date;

pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(ctx.store().await?);

    match args.command {
        ProductsCommand::List { limit } => list(&catalog, limit, ctx).await,
        ProductsCommand::Add {
            title,
            price,
            original_price,
            description,
            category,
            images,
            slug,
        } => {
            ctx.require_admin().await?;
            let draft = ProductDraft {
                title,
                description,
                price: Some(price),
                original_price,
                images,
                category,
                slug,
            };
            let product = catalog.create(draft).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.success(&format!("Created {} ({})", product.title, product.id));
                if product.slug.is_none() {
                    ctx.output.warn("Title has no usable slug; the product is addressed by id");
                }
                print_product(&product, ctx)?;
            }
            Ok(())
        }
        ProductsCommand::Show { key } => {
            let product = catalog.resolve(&key).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.header(&product.title);
                print_product(&product, ctx)?;
            }
            Ok(())
        }
        ProductsCommand::Edit {
            id,
            title,
            price,
            original_price,
            clear_original_price,
            description,
            category,
            slug,
        } => {
            let update = ProductUpdate {
                title,
                description,
                price,
                original_price: if clear_original_price {
                    Some(None)
                } else {
                    original_price.map(Some)
                },
                images: None,
                category: category.map(|c| Some(c).filter(|c| !c.trim().is_empty())),
                slug,
            };
            if update.is_empty() {
                bail!("Nothing to change");
            }
            ctx.require_admin().await?;
            let product = catalog.update(&ProductId::new(id), update).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output.success(&format!("Updated {}", product.title));
                print_product(&product, ctx)?;
            }
            Ok(())
        }
        ProductsCommand::Delete { ids, yes } => {
            ctx.require_admin().await?;
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete {} product(s)?", ids.len()))
                    .default(false)
                    .interact()?
            {
                ctx.output.info("Cancelled");
                return Ok(());
            }
            let result = catalog.delete_many(&ids).await;
            ctx.output.batch("Deleted", &result);
            if let Some(summary) = result.failure_summary() {
                bail!(summary);
            }
            Ok(())
        }
        ProductsCommand::Export { output } => {
            let csv = products_csv(&catalog.list(None).await?);
            write_export(output.as_deref(), &csv, ctx)
        }
    }
}

async fn list(catalog: &CatalogService, limit: Option<usize>, ctx: &Context) -> Result<()> {
    let products = catalog.list(limit).await?;
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }
    if products.is_empty() {
        ctx.output.info("No products yet");
        return Ok(());
    }

    let currency = ctx.config.currency()?;
    let widths = [20, 28, 24, 12, 16];
    ctx.output.header(&format!("{} product(s)", products.len()));
    ctx.output
        .table_row(&["ID", "TITLE", "SLUG", "PRICE", "CREATED"], &widths);
    for product in &products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.title,
                product.slug.as_deref().unwrap_or("-"),
                &product.price_money(currency).display(),
                &format_date(product.created_at),
            ],
            &widths,
        );
    }
    Ok(())
}

fn print_product(product: &Product, ctx: &Context) -> Result<()> {
    let currency = ctx.config.currency()?;
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("slug", product.slug.as_deref().unwrap_or("-"));
    ctx.output.kv("price", &product.price_money(currency).display());
    if let Some(pct) = product.discount_percentage() {
        ctx.output.kv("discount", &format!("{pct:.0}%"));
    }
    if let Some(category) = &product.category {
        ctx.output.kv("category", category);
    }
    if !product.description.is_empty() {
        ctx.output.kv("description", &product.description);
    }
    for image in &product.images {
        ctx.output.list_item(image);
    }
    Ok(())
}

/// Write CSV to a file, or stdout when no file is given.
pub fn write_export(output: Option<&str>, csv: &str, ctx: &Context) -> Result<()> {
    match output {
        Some(path) => {
            let path = ctx.resolve_path(path);
            std::fs::write(&path, csv)?;
            ctx.output.success(&format!("Wrote {}", path.display()));
        }
        None => print!("{csv}"),
    }
    Ok(())
}
