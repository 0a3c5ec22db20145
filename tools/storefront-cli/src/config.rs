//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::{DEFAULT_CART_KEY, DEFAULT_TAX_RATE_BPS};
use storefront_commerce::Currency;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Storefront configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Where products come from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Order summary settings.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Default log filter when `STOREFRONT_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            checkout: CheckoutConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
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

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Configured currency, if the code is known.
    pub fn currency(&self) -> Option<Currency> {
        Currency::from_code(&self.catalog.currency)
    }

    /// Problems that would make the config unusable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.storage.dir.trim().is_empty() {
            errors.push("storage.dir is required".to_string());
        }
        if self.storage.cart_key.trim().is_empty() {
            errors.push("storage.cart_key is required".to_string());
        }
        if self.currency().is_none() {
            errors.push(format!("catalog.currency '{}' is not supported", self.catalog.currency));
        }
        if self.checkout.tax_rate_bps > 10_000 {
            errors.push("checkout.tax_rate_bps must be 0-10000".to_string());
        }
        if tracing_subscriber::EnvFilter::try_new(&self.log_level).is_err() {
            errors.push(format!("log_level '{}' is not a valid filter", self.log_level));
        }
        errors
    }
}

/// Cart persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding one file per stored key.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// JSON catalog file. The built-in sample catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// ISO currency code for cart totals.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            currency: default_currency(),
        }
    }
}

/// Checkout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    /// Sales tax in basis points (1000 = 10%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

fn default_storage_dir() -> String {
    ".storefront".to_string()
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Generate a default storefront.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront configuration

log_level = "warn"

[storage]
dir = ".storefront"
cart_key = "{cart_key}"

[catalog]
# path = "catalog.json"
currency = "USD"

[checkout]
tax_rate_bps = {tax}
"#,
        cart_key = DEFAULT_CART_KEY,
        tax = DEFAULT_TAX_RATE_BPS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_default() {
        let config: StorefrontConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StorefrontConfig = toml::from_str("[checkout]\ntax_rate_bps = 825\n").unwrap();
        assert_eq!(config.checkout.tax_rate_bps, 825);
        assert_eq!(config.storage.cart_key, "cart");
        assert_eq!(config.currency(), Some(Currency::USD));
    }

    #[test]
    fn test_save_and_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::default();
        config.catalog.path = Some("catalog.json".into());
        config.log_level = "debug".into();

        for name in ["storefront.toml", "storefront.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(StorefrontConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = StorefrontConfig::default();
        config.catalog.currency = "XYZ".into();
        config.checkout.tax_rate_bps = 20_000;
        config.storage.cart_key = " ".into();
        assert_eq!(config.validate().len(), 3);
    }
}
