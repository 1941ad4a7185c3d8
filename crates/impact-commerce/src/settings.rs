//! Platform settings consumed by the impact calculator and billing.
//!
//! Settings are stored as string key/value pairs. Reading them is lenient:
//! bad values fall back to defaults so a landing page always renders.
//! Writing them through [`Settings::set`] is strict.

use crate::ImpactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Fallback price of one kilogram of recovered plastic, in EUR.
pub const DEFAULT_PRICE_PER_KG: f64 = 0.11;
/// Default wallet balance (EUR) at which a certificate is issued.
pub const DEFAULT_CERTIFICATION_THRESHOLD: f64 = 10.0;
/// Default impact multiplier for weight-based claims.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;
/// Default monthly billing floor (EUR).
pub const DEFAULT_MONTHLY_BILLING_MINIMUM: f64 = 0.0;

/// Known setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    PricePerKg,
    CertificationThreshold,
    DefaultMultiplier,
    MonthlyBillingMinimum,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::PricePerKg,
        SettingKey::CertificationThreshold,
        SettingKey::DefaultMultiplier,
        SettingKey::MonthlyBillingMinimum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::PricePerKg => "PRICE_PER_KG",
            SettingKey::CertificationThreshold => "CERTIFICATION_THRESHOLD",
            SettingKey::DefaultMultiplier => "DEFAULT_MULTIPLIER",
            SettingKey::MonthlyBillingMinimum => "MONTHLY_BILLING_MINIMUM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRICE_PER_KG" => Some(SettingKey::PricePerKg),
            "CERTIFICATION_THRESHOLD" => Some(SettingKey::CertificationThreshold),
            "DEFAULT_MULTIPLIER" => Some(SettingKey::DefaultMultiplier),
            "MONTHLY_BILLING_MINIMUM" => Some(SettingKey::MonthlyBillingMinimum),
            _ => None,
        }
    }

    /// Value used when the key is missing or rejected.
    pub fn default_value(&self) -> f64 {
        match self {
            SettingKey::PricePerKg => DEFAULT_PRICE_PER_KG,
            SettingKey::CertificationThreshold => DEFAULT_CERTIFICATION_THRESHOLD,
            SettingKey::DefaultMultiplier => DEFAULT_MULTIPLIER,
            SettingKey::MonthlyBillingMinimum => DEFAULT_MONTHLY_BILLING_MINIMUM,
        }
    }

    /// Check a candidate value against the key's range.
    fn validate(&self, value: f64) -> Result<f64, &'static str> {
        if !value.is_finite() {
            return Err("must be a finite number");
        }
        match self {
            SettingKey::PricePerKg
            | SettingKey::CertificationThreshold
            | SettingKey::DefaultMultiplier => {
                if value > 0.0 {
                    Ok(value)
                } else {
                    Err("must be greater than zero")
                }
            }
            SettingKey::MonthlyBillingMinimum => {
                if value >= 0.0 {
                    Ok(value)
                } else {
                    Err("must not be negative")
                }
            }
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated platform settings.
///
/// `price_per_kg` is always finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct Settings {
    #[serde(rename = "PRICE_PER_KG")]
    price_per_kg: f64,
    #[serde(rename = "CERTIFICATION_THRESHOLD")]
    certification_threshold: f64,
    #[serde(rename = "DEFAULT_MULTIPLIER")]
    default_multiplier: f64,
    #[serde(rename = "MONTHLY_BILLING_MINIMUM")]
    monthly_billing_minimum: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            price_per_kg: DEFAULT_PRICE_PER_KG,
            certification_threshold: DEFAULT_CERTIFICATION_THRESHOLD,
            default_multiplier: DEFAULT_MULTIPLIER,
            monthly_billing_minimum: DEFAULT_MONTHLY_BILLING_MINIMUM,
        }
    }
}

impl Settings {
    /// Build settings from raw key/value pairs.
    ///
    /// Unknown keys are ignored; unparseable or out-of-range values keep the
    /// default for that key.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Settings::default();
        for (key, value) in entries {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(setting) = SettingKey::from_str(key) else {
                debug!(key, "ignoring unknown setting");
                continue;
            };
            if let Err(e) = settings.set(setting.as_str(), value) {
                warn!(error = %e, "keeping default for rejected setting");
            }
        }
        settings
    }

    /// Update one setting, rejecting unknown keys and out-of-range values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ImpactError> {
        let invalid = |reason: &str| ImpactError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let setting = SettingKey::from_str(key).ok_or_else(|| invalid("unknown key"))?;
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| invalid("not a number"))?;
        let parsed = setting.validate(parsed).map_err(invalid)?;

        match setting {
            SettingKey::PricePerKg => self.price_per_kg = parsed,
            SettingKey::CertificationThreshold => self.certification_threshold = parsed,
            SettingKey::DefaultMultiplier => self.default_multiplier = parsed,
            SettingKey::MonthlyBillingMinimum => self.monthly_billing_minimum = parsed,
        }
        Ok(())
    }

    pub fn get(&self, key: SettingKey) -> f64 {
        match key {
            SettingKey::PricePerKg => self.price_per_kg,
            SettingKey::CertificationThreshold => self.certification_threshold,
            SettingKey::DefaultMultiplier => self.default_multiplier,
            SettingKey::MonthlyBillingMinimum => self.monthly_billing_minimum,
        }
    }

    /// Render back to the key/value store shape.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SettingKey::ALL
            .iter()
            .map(|key| (key.as_str(), self.get(*key).to_string()))
            .collect()
    }

    pub fn price_per_kg(&self) -> f64 {
        self.price_per_kg
    }

    pub fn certification_threshold(&self) -> f64 {
        self.certification_threshold
    }

    pub fn default_multiplier(&self) -> f64 {
        self.default_multiplier
    }

    pub fn monthly_billing_minimum(&self) -> f64 {
        self.monthly_billing_minimum
    }
}

/// Deserialization shape; every field is optional and unchecked.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(rename = "PRICE_PER_KG")]
    price_per_kg: Option<f64>,
    #[serde(rename = "CERTIFICATION_THRESHOLD")]
    certification_threshold: Option<f64>,
    #[serde(rename = "DEFAULT_MULTIPLIER")]
    default_multiplier: Option<f64>,
    #[serde(rename = "MONTHLY_BILLING_MINIMUM")]
    monthly_billing_minimum: Option<f64>,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let pick = |key: SettingKey, value: Option<f64>| match value {
            None => key.default_value(),
            Some(v) => key.validate(v).unwrap_or_else(|reason| {
                warn!(key = key.as_str(), value = v, reason, "keeping default for rejected setting");
                key.default_value()
            }),
        };

        Self {
            price_per_kg: pick(SettingKey::PricePerKg, raw.price_per_kg),
            certification_threshold: pick(
                SettingKey::CertificationThreshold,
                raw.certification_threshold,
            ),
            default_multiplier: pick(SettingKey::DefaultMultiplier, raw.default_multiplier),
            monthly_billing_minimum: pick(
                SettingKey::MonthlyBillingMinimum,
                raw.monthly_billing_minimum,
            ),
        }
    }
}
