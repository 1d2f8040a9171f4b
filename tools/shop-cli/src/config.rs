//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shop_commerce::checkout::DeliveryFees;
use shop_commerce::Currency;
use shop_observability::LoggingConfig;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub webhook: WebhookSection,

    #[serde(default)]
    pub media: MediaSection,

    #[serde(default)]
    pub admin: AdminSection,

    #[serde(default)]
    pub log: LoggingConfig,
}

impl ShopConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn fees(&self) -> DeliveryFees {
        DeliveryFees {
            inside: self.pricing.inside,
            outside: self.pricing.outside,
        }
    }

    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.pricing.currency)
            .with_context(|| format!("Unknown currency: {}", self.pricing.currency))
    }

    /// Check the config, returning `(errors, warnings)`.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.store.path.trim().is_empty() {
            errors.push("store.path is required".to_string());
        }
        if Currency::from_code(&self.pricing.currency).is_none() {
            errors.push(format!("pricing.currency '{}' is not supported", self.pricing.currency));
        }
        for (key, fee) in [("inside", self.pricing.inside), ("outside", self.pricing.outside)] {
            if !fee.is_finite() || fee < 0.0 {
                errors.push(format!("pricing.{key} must be zero or more"));
            }
        }
        if let Some(url) = &self.webhook.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push("webhook.url must be an http(s) URL".to_string());
            }
        }
        if self.webhook.timeout_secs == 0 {
            errors.push("webhook.timeout_secs must be positive".to_string());
        }
        match (&self.media.endpoint, &self.media.upload_preset) {
            (Some(_), None) => errors.push("media.upload_preset is required with media.endpoint".to_string()),
            (None, Some(_)) => warnings.push("media.upload_preset is set but media.endpoint is not".to_string()),
            _ => {}
        }
        match (&self.admin.email, &self.admin.password_hash) {
            (None, None) => warnings.push("no [admin] account; admin commands run without sign-in".to_string()),
            (Some(_), None) | (None, Some(_)) => {
                errors.push("admin.email and admin.password_hash must be set together".to_string())
            }
            (Some(_), Some(hash)) if !hash.starts_with("$argon2") => {
                errors.push("admin.password_hash must be an Argon2 hash (see `shop config hash-password`)".to_string())
            }
            _ => {}
        }

        (errors, warnings)
    }

    /// The store snapshot path, relative paths resolved against `base`.
    pub fn store_path(&self, base: &Path) -> PathBuf {
        let path = PathBuf::from(&self.store.path);
        if path.is_absolute() {
            path
        } else {
            base.join(path)
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot file.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "shop-data.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Currency and delivery fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Fee inside the city.
    #[serde(default = "default_inside_fee")]
    pub inside: f64,

    /// Fee outside the city.
    #[serde(default = "default_outside_fee")]
    pub outside: f64,
}

fn default_currency() -> String {
    "BDT".to_string()
}

fn default_inside_fee() -> f64 {
    DeliveryFees::DEFAULT_INSIDE
}

fn default_outside_fee() -> f64 {
    DeliveryFees::DEFAULT_OUTSIDE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            inside: default_inside_fee(),
            outside: default_outside_fee(),
        }
    }
}

/// Order notification webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    10
}

impl Default for WebhookSection {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

impl WebhookSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Media host for product images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_preset: Option<String>,
}

/// Back-office account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Argon2 PHC string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Find a config file in `start` or any parent directory.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Generate a default shop.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront back-office configuration

[store]
path = "shop-data.json"

[pricing]
currency = "BDT"
inside = {inside:.1}
outside = {outside:.1}

[webhook]
# url = "https://hooks.example.com/orders"
timeout_secs = 10

[media]
# endpoint = "https://api.cloudinary.com/v1_1/<cloud>/image/upload"
# upload_preset = "unsigned_products"

[admin]
# email = "admin@example.com"
# password_hash = "<output of `shop config hash-password`>"

[log]
format = "human"
level = "info"
"#,
        inside = DeliveryFees::DEFAULT_INSIDE,
        outside = DeliveryFees::DEFAULT_OUTSIDE,
    )
}
