//! CLI configuration.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use telly_commerce::cart::CartConfig;
use telly_commerce::checkout::{CheckoutPolicy, ReceiptHeader};

/// Names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["telly.toml", ".telly.toml", "telly.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where cart slots live on disk.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart slot and line defaults.
    #[serde(default)]
    pub cart: CartConfig,

    /// Shipping and tax.
    #[serde(default)]
    pub checkout: CheckoutPolicy,

    /// Name and contact printed on receipts.
    #[serde(default)]
    pub business: BusinessConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Problems that make the config unusable. Empty when it is fine.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.storage.dir.trim().is_empty() {
            problems.push("storage.dir must not be empty".to_string());
        }
        if self.cart.slot_key.trim().is_empty() {
            problems.push("cart.slot_key must not be empty".to_string());
        }
        if self.cart.default_size.trim().is_empty() {
            problems.push("cart.default_size must not be empty".to_string());
        }
        if self.business.name.trim().is_empty() {
            problems.push("business.name must not be empty".to_string());
        }
        if let Err(e) = self.checkout.validate() {
            problems.push(format!("checkout: {}", e));
        }

        problems
    }

    /// Fail with every problem listed, for commands that need a usable config.
    pub fn ensure_valid(&self) -> Result<()> {
        let problems = self.problems();
        if !problems.is_empty() {
            bail!(
                "Invalid configuration: {}. Run `telly config validate` for details.",
                problems.join("; ")
            );
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding slot files, relative to the working directory.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".telly".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Business details for receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_business_name")]
    pub name: String,
    #[serde(default = "default_business_email")]
    pub email: String,
}

fn default_business_name() -> String {
    "Bikinis By Telly".to_string()
}

fn default_business_email() -> String {
    "bikinisbytelly@outlook.com".to_string()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            email: default_business_email(),
        }
    }
}

impl BusinessConfig {
    pub fn receipt_header(&self) -> ReceiptHeader {
        ReceiptHeader::new(self.name.clone(), self.email.clone())
    }
}

/// Generate a default telly.toml config file.
pub fn generate_default_config() -> String {
    r#"# Telly storefront configuration

[storage]
dir = ".telly"

[cart]
slot_key = "cart"
default_size = "M"
currency = "USD"

[checkout]
flat_shipping_cents = 1000
free_shipping_threshold_cents = 10000
tax_rate_percent = 8.0

[business]
name = "Bikinis By Telly"
email = "bikinisbytelly@outlook.com"
"#
    .to_string()
}
