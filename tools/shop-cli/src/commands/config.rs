//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use dialoguer::Password;
use shop_auth::PasswordHasher;
use shop_cli::config::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
        ConfigCommand::HashPassword => hash_password(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.info("[store]");
    ctx.output.kv("path", &config.store_path(&ctx.base_dir()).display().to_string());

    ctx.output.info("[pricing]");
    ctx.output.kv("currency", &config.pricing.currency);
    ctx.output.kv("inside", &config.pricing.inside.to_string());
    ctx.output.kv("outside", &config.pricing.outside.to_string());

    ctx.output.info("[webhook]");
    ctx.output.kv("url", config.webhook.url.as_deref().unwrap_or("(none)"));
    ctx.output.kv("timeout_secs", &config.webhook.timeout_secs.to_string());

    ctx.output.info("[media]");
    ctx.output.kv("endpoint", config.media.endpoint.as_deref().unwrap_or("(none)"));
    ctx.output.kv(
        "upload_preset",
        config.media.upload_preset.as_deref().unwrap_or("(none)"),
    );

    ctx.output.info("[admin]");
    ctx.output.kv("email", config.admin.email.as_deref().unwrap_or("(none)"));
    let hash_state = if config.admin.password_hash.is_some() { "set" } else { "(none)" };
    ctx.output.kv("password_hash", hash_state);

    ctx.output.info("[log]");
    ctx.output.kv("directive", &config.log.default_directive());
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shop.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.check();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn hash_password(ctx: &Context) -> Result<()> {
    let password = Password::new()
        .with_prompt("Admin password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    PasswordHasher::validate_password(&password)?;
    let hash = PasswordHasher::new().hash(&password)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "password_hash": hash }));
    } else {
        ctx.output.info("Add this to the [admin] section:");
        println!("password_hash = \"{hash}\"");
    }
    Ok(())
}
