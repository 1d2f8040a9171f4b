//! CLI execution context.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_auth::{InMemoryAuthProvider, Role, SessionContext, User};
use shop_cli::config::{find_config, ShopConfig};
use shop_commerce::admin::OrderAdmin;
use shop_commerce::catalog::CatalogService;
use shop_commerce::checkout::CheckoutService;
use shop_data::{WebhookConfig, WebhookNotifier};
use shop_store::{DocumentStore, InMemoryStore};

use crate::output::Output;

/// Environment variable read for the admin password before prompting.
pub const ADMIN_PASSWORD_ENV: &str = "SHOP_ADMIN_PASSWORD";

/// Execution context for CLI commands.
pub struct Context {
    pub config: ShopConfig,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load context, from `config_path` or the nearest config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => ShopConfig::load(path)?,
            None => ShopConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory relative paths in the config are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| self.cwd.clone())
    }

    pub async fn store(&self) -> Result<Arc<dyn DocumentStore>> {
        let path = self.config.store_path(&self.base_dir());
        self.output.debug(&format!("Using store {}", path.display()));
        let store = InMemoryStore::open(&path)
            .await
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        Ok(Arc::new(store))
    }

    pub fn catalog(&self, store: Arc<dyn DocumentStore>) -> CatalogService {
        CatalogService::new(store)
    }

    pub fn admin(&self, store: Arc<dyn DocumentStore>) -> OrderAdmin {
        OrderAdmin::new(store)
    }

    /// Checkout service, returning the webhook notifier separately so the
    /// caller can let delivery finish before the process exits.
    pub fn checkout(&self, store: Arc<dyn DocumentStore>) -> Result<(CheckoutService, Option<WebhookNotifier>)> {
        let service = CheckoutService::new(store, self.config.fees());
        match &self.config.webhook.url {
            Some(url) => {
                let notifier = WebhookNotifier::new(
                    WebhookConfig::new(url.clone()).with_timeout(self.config.webhook.timeout()),
                )
                .context("Invalid webhook configuration")?;
                Ok((service, Some(notifier)))
            }
            None => Ok((service, None)),
        }
    }

    /// Sign in as the configured admin before a back-office change.
    ///
    /// Without an `[admin]` section there is nobody to sign in as, and the
    /// command proceeds with a warning.
    pub async fn require_admin(&self) -> Result<Option<User>> {
        let (Some(email), Some(hash)) = (&self.config.admin.email, &self.config.admin.password_hash) else {
            self.output
                .warn("No [admin] account configured; running without sign-in");
            return Ok(None);
        };

        let provider = InMemoryAuthProvider::new();
        provider.add_account(email, hash.clone(), vec![Role::Admin]).await;
        let session = SessionContext::new(Arc::new(provider));

        let password = match std::env::var(ADMIN_PASSWORD_ENV) {
            Ok(password) => password,
            Err(_) => dialoguer::Password::new()
                .with_prompt(format!("Password for {email}"))
                .interact()
                .context("Failed to read password")?,
        };

        session
            .sign_in(email, &password)
            .await
            .context("Admin sign-in failed")?;
        let user = session.require_role(Role::Admin)?;
        self.output.debug(&format!("Signed in as {}", user.display_name()));
        Ok(Some(user))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }
}
