//! CLI command implementations.

pub mod config;
pub mod orders;
pub mod products;
pub mod quote;
pub mod report;
pub mod slug;
pub mod upload;

use clap::{Args, Subcommand};

/// Parse a price, rejecting negative and non-finite values.
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !price.is_finite() || price < 0.0 {
        return Err("price must be zero or more".to_string());
    }
    Ok(price)
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Price per kilogram. Ignored when --product is given.
    #[arg(long, required_unless_present = "product", value_parser = parse_price)]
    pub price: Option<f64>,

    /// Take the price from this product (slug or id).
    #[arg(long)]
    pub product: Option<String>,

    /// Unit size: half or whole.
    #[arg(short, long, default_value = "whole")]
    pub unit: String,

    /// Number of items.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Delivery zone: inside or outside.
    #[arg(short, long, default_value = "inside")]
    pub zone: String,
}

/// Arguments for the slug command.
#[derive(Args)]
pub struct SlugArgs {
    /// Product title or typed slug.
    pub title: String,

    /// Check the slug as typed instead of suggesting one.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products, newest first.
    List {
        /// Show only the first N products.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Add a product.
    Add {
        /// Product title.
        title: String,

        /// Price per kilogram.
        #[arg(long)]
        price: f64,

        /// Regular price shown struck through.
        #[arg(long)]
        original_price: Option<f64>,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long)]
        category: Option<String>,

        /// Image URL (repeatable).
        #[arg(short, long = "image")]
        images: Vec<String>,

        /// Custom slug; derived from the title when omitted.
        #[arg(short, long)]
        slug: Option<String>,
    },
    /// Show one product by slug or id.
    Show {
        key: String,
    },
    /// Change a product's fields.
    Edit {
        /// Product id.
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        original_price: Option<f64>,

        /// Remove the original price.
        #[arg(long, conflicts_with = "original_price")]
        clear_original_price: bool,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete products.
    Delete {
        /// Product ids.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Export products as CSV.
    Export {
        /// Output file (stdout when omitted).
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first.
    List {
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only orders with this status.
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Place an order as a customer would.
    Place {
        /// Product slug or id.
        #[arg(long)]
        product: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,

        #[arg(short, long, default_value = "whole")]
        unit: String,

        #[arg(short, long, default_value = "inside")]
        zone: String,
    },
    /// Confirm pending orders.
    Confirm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete orders.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Export orders as CSV.
    Export {
        /// Output file (stdout when omitted).
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// Image file to upload.
    pub file: String,

    /// Append the uploaded URL to this product (slug or id).
    #[arg(long)]
    pub product: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
    /// Hash a password for the [admin] section.
    HashPassword,
}
