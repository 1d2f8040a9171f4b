//! Shop CLI - back-office tool for the storefront.
//!
//! Commands:
//! - `shop quote` - Price an order
//! - `shop slug` - Suggest or check a product slug
//! - `shop products` - Manage the catalog
//! - `shop orders` - Place, confirm, delete and export orders
//! - `shop report` - Dashboard summary
//! - `shop upload` - Upload a product image
//! - `shop config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shop_observability::{init_tracing, LogLevel};

use commands::{ConfigArgs, OrdersArgs, ProductsArgs, QuoteArgs, SlugArgs, UploadArgs};

/// Shop CLI - manage the storefront catalog and orders
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an order without placing it
    Quote(QuoteArgs),

    /// Suggest or check a product slug
    Slug(SlugArgs),

    /// Manage products
    Products(ProductsArgs),

    /// Manage orders
    Orders(OrdersArgs),

    /// Show dashboard totals
    Report,

    /// Upload a product image
    Upload(UploadArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let mut log = ctx.config.log.clone();
    if cli.verbose {
        log.level = LogLevel::Debug;
    }
    if let Err(e) = init_tracing(&log) {
        ctx.output.warn(&format!("Logging disabled: {e}"));
    }

    let result = match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Slug(args) => commands::slug::run(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Report => commands::report::run(&ctx).await,
        Commands::Upload(args) => commands::upload::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
