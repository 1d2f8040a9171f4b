//! Slug suggestions and availability checks.

use anyhow::Result;
use serde_json::json;
use shop_commerce::catalog::{slugify, SlugStatus};

use super::SlugArgs;
use crate::context::Context;

pub async fn run(args: SlugArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(ctx.store().await?);
    let slugs = catalog.slugs();

    if args.check {
        let status = slugs.status(&args.title).await;
        let (slug, available) = match &status {
            SlugStatus::Empty => (String::new(), false),
            SlugStatus::Available(s) => (s.clone(), true),
            SlugStatus::Taken(s) => (s.clone(), false),
        };

        if ctx.output.is_json() {
            ctx.output.json(&json!({ "slug": slug, "available": available }));
        } else {
            match status {
                SlugStatus::Empty => ctx.output.warn("No usable slug in that input"),
                SlugStatus::Available(s) => ctx.output.success(&format!("{s} is available")),
                SlugStatus::Taken(s) => ctx.output.warn(&format!("{s} is already taken")),
            }
        }
        return Ok(());
    }

    let base = slugify(&args.title);
    let suggestion = slugs.suggest(&args.title).await;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "base": base, "suggestion": suggestion }));
    } else if suggestion.is_empty() {
        ctx.output.warn("Title has no usable slug; the product would be addressed by id");
    } else {
        ctx.output.kv("base", &base);
        ctx.output.kv("suggestion", &suggestion);
    }
    Ok(())
}
