//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_cache::{cache_key, Cache, FileStore};
use storefront_commerce::catalog::{fixtures, InMemoryCatalog};
use storefront_commerce::cart::CartStore;
use storefront_commerce::Currency;
use tracing::{debug, warn};

use crate::config::{StorefrontConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// File the config was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Cart profile selected with `--profile`.
    pub profile: Option<String>,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// walking up from the working directory.
    pub fn load(
        config_path: Option<&str>,
        profile: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (StorefrontConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            profile,
        })
    }

    /// Directory holding persisted storefront state.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Storage key for the selected cart profile.
    pub fn cart_key(&self) -> String {
        match &self.profile {
            Some(profile) => cache_key!(self.config.storage.cart_key.as_str(), profile),
            None => self.config.storage.cart_key.clone(),
        }
    }

    /// Open the cart for the selected profile and load its persisted lines.
    pub fn open_cart(&self) -> Result<CartStore<FileStore>> {
        let dir = self.storage_dir();
        let files = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        let currency = self.config.currency().unwrap_or_else(|| {
            warn!(currency = %self.config.catalog.currency, "unknown currency, using USD");
            Currency::USD
        });
        debug!(dir = %dir.display(), key = %self.cart_key(), "opening cart");

        let mut store = CartStore::new(Cache::new(files))
            .with_key(self.cart_key())
            .with_currency(currency)
            .with_tax_rate(self.config.checkout.tax_rate_bps);
        store.hydrate();
        Ok(store)
    }

    /// Configured catalog file, resolved against the working directory.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.config.catalog.path.as_deref().map(|p| self.resolve_path(p))
    }

    /// Load the configured catalog, or the sample catalog when none is set.
    pub fn load_catalog(&self) -> Result<InMemoryCatalog> {
        match self.catalog_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading catalog");
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                InMemoryCatalog::from_json(&json)
                    .with_context(|| format!("Failed to parse catalog: {}", path.display()))
            }
            None => {
                debug!("no catalog configured, using sample catalog");
                Ok(fixtures::sample_catalog())
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Find the nearest config file in the directory tree.
pub fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let path = current.join(name);
            if path.exists() {
                if let Ok(config) = StorefrontConfig::load(&path) {
                    return Some((config, path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
