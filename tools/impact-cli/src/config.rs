//! CLI configuration.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use impact_commerce::catalog::{Sku, SkuCatalog};
use impact_commerce::settings::{SettingKey, Settings};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["impact.toml", ".impact.toml", "impact.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Platform settings, stored as the back office stores them: key/value.
    #[serde(default)]
    pub settings: BTreeMap<String, toml::Value>,

    /// SKU catalog.
    #[serde(default)]
    pub skus: Vec<Sku>,

    /// Data file locations.
    #[serde(default)]
    pub files: FilesConfig,
}

impl ImpactConfig {
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

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Raw settings as strings.
    pub fn setting_entries(&self) -> Vec<(String, String)> {
        self.settings
            .iter()
            .map(|(key, value)| (key.clone(), setting_string(value)))
            .collect()
    }

    /// Effective settings. Bad values fall back to defaults.
    pub fn settings(&self) -> Settings {
        Settings::from_entries(self.setting_entries())
    }

    /// Build the SKU catalog.
    pub fn catalog(&self) -> Result<SkuCatalog> {
        SkuCatalog::from_skus(self.skus.iter().cloned()).context("Invalid SKU catalog in config")
    }
}

fn setting_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Data file locations, relative to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Gift code ledger (JSON).
    #[serde(default = "default_gift_codes")]
    pub gift_codes: String,

    /// Transaction history (JSON).
    #[serde(default = "default_transactions")]
    pub transactions: String,

    /// Issued certificates (JSON).
    #[serde(default = "default_certificates")]
    pub certificates: String,
}

fn default_gift_codes() -> String {
    "data/gift-codes.json".to_string()
}

fn default_transactions() -> String {
    "data/transactions.json".to_string()
}

fn default_certificates() -> String {
    "data/certificates.json".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            gift_codes: default_gift_codes(),
            transactions: default_transactions(),
            certificates: default_certificates(),
        }
    }
}

/// Generate a default impact.toml config file.
pub fn generate_default_config() -> String {
    let settings: Vec<String> = SettingKey::ALL
        .iter()
        .map(|key| format!("{} = {:?}", key.as_str(), key.default_value()))
        .collect();

    format!(
        r#"# Impact platform configuration

[settings]
{settings}

[files]
gift_codes = "data/gift-codes.json"
transactions = "data/transactions.json"
certificates = "data/certificates.json"

# Weight-based claim funded by a merchant (case A)
[[skus]]
code = "BOTTLE-500"
name = "Water bottle 500ml"
paymentMode = "CLAIM"
weightGrams = 2500
multiplier = 2.0
merchantId = "acme"

# Direct payment (case C)
[[skus]]
code = "OFFSET-11"
name = "Offset 100 kg"
paymentMode = "PAY"
price = 11.0

# Gift card (case D)
[[skus]]
code = "GIFT-10"
name = "Gift card 10 EUR"
paymentMode = "GIFT_CARD"
price = 10.0

# Partner allocation (case E)
[[skus]]
code = "ALLOC-SHOP"
name = "Webshop allocation"
paymentMode = "ALLOCATION"
price = 1.1
partnerId = "shop-co"
"#,
        settings = settings.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: ImpactConfig = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.skus.len(), 4);
        assert_eq!(config.settings(), Settings::default());
        assert_eq!(config.files.transactions, "data/transactions.json");

        let catalog = config.catalog().unwrap();
        let bottle = catalog.resolve("BOTTLE-500").unwrap();
        assert_eq!(bottle.weight_grams, 2500.0);
        assert_eq!(bottle.merchant_id.as_ref().map(|m| m.as_str()), Some("acme"));
    }

    #[test]
    fn test_settings_accept_strings_and_numbers() {
        let config: ImpactConfig = toml::from_str(
            r#"
[settings]
PRICE_PER_KG = "0.2"
CERTIFICATION_THRESHOLD = 5
DEFAULT_MULTIPLIER = -1
"#,
        )
        .unwrap();

        let settings = config.settings();
        assert_eq!(settings.price_per_kg(), 0.2);
        assert_eq!(settings.certification_threshold(), 5.0);
        assert_eq!(settings.default_multiplier(), 1.0);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: ImpactConfig = toml::from_str("").unwrap();
        assert!(config.skus.is_empty());
        assert_eq!(config.files.gift_codes, "data/gift-codes.json");
    }
}
