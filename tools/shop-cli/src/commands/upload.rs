//! Upload a product image to the media host.

use anyhow::{Context as _, Result};
use serde_json::json;
use shop_commerce::catalog::ProductUpdate;
use shop_data::{progress_channel, MediaConfig, MediaUploader};

use super::UploadArgs;
use crate::context::Context;
use crate::output::format_bytes;

pub async fn run(args: UploadArgs, ctx: &Context) -> Result<()> {
    let endpoint = ctx
        .config
        .media
        .endpoint
        .clone()
        .context("No media.endpoint configured")?;
    let preset = ctx
        .config
        .media
        .upload_preset
        .clone()
        .context("No media.upload_preset configured")?;

    let path = ctx.resolve_path(&args.file);
    let size = std::fs::metadata(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?
        .len();

    // Resolve the product first so a bad key fails before uploading.
    let target = match &args.product {
        Some(key) => {
            ctx.require_admin().await?;
            let catalog = ctx.catalog(ctx.store().await?);
            let product = catalog.resolve(key).await?;
            Some((catalog, product))
        }
        None => None,
    };

    let uploader = MediaUploader::new(MediaConfig::new(endpoint, preset))?;
    let (tx, mut rx) = progress_channel();
    let pb = ctx.output.progress(size, &format!("uploading {}", format_bytes(size)));
    let bar = pb.clone();
    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            bar.set_length(progress.total);
            bar.set_position(progress.sent);
        }
    });

    let result = uploader.upload_file(&path, tx).await;
    watcher.await.ok();
    pb.finish_and_clear();
    let media = result?;

    if let Some((catalog, product)) = target {
        let mut images = product.images.clone();
        images.push(media.url.clone());
        catalog
            .update(
                &product.id,
                ProductUpdate {
                    images: Some(images),
                    ..ProductUpdate::default()
                },
            )
            .await?;
        ctx.output.success(&format!("Added image to {}", product.title));
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "url": media.url, "publicId": media.public_id }));
    } else {
        ctx.output.success(&format!("Uploaded {}", media.url));
    }
    Ok(())
}
