//! Landing URL query parameters.

use crate::catalog::Sku;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters parsed from a landing URL. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingParams {
    pub sku: Option<String>,
    pub amount: Option<f64>,
    pub merchant: Option<String>,
    pub partner: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub weight: Option<f64>,
    pub multiplier: Option<f64>,
    /// Pre-filled gift code.
    pub code: Option<String>,
}

impl LandingParams {
    /// Parse a query string.
    ///
    /// Accepts `sku=A&amount=5`, `?sku=A` or a full URL. Malformed values
    /// are dropped rather than reported.
    ///
    /// ```
    /// use impact_commerce::landing::LandingParams;
    /// let params = LandingParams::from_query("https://x.test/l?sku=BOTTLE&amount=11&name=Ana%20B");
    /// assert_eq!(params.sku.as_deref(), Some("BOTTLE"));
    /// assert_eq!(params.amount, Some(11.0));
    /// assert_eq!(params.name.as_deref(), Some("Ana B"));
    /// ```
    pub fn from_query(input: &str) -> Self {
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut params = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.apply(&decode(key), decode(value));
        }
        params
    }

    /// Set a single parameter by name. Unknown names are ignored.
    pub fn apply(&mut self, key: &str, value: String) {
        match key.trim().to_ascii_lowercase().as_str() {
            "sku" => self.sku = text(value),
            "amount" => self.amount = number(key, &value),
            "merchant" => self.merchant = text(value),
            "partner" => self.partner = text(value),
            "name" => self.name = text(value),
            "email" => self.email = text(value),
            "weight" => self.weight = number(key, &value),
            "multiplier" => self.multiplier = number(key, &value),
            "code" => self.code = text(value),
            other => debug!(param = other, "ignoring unknown landing parameter"),
        }
    }

    pub fn for_sku(code: impl Into<String>) -> Self {
        Self {
            sku: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The `amount` parameter if it is positive.
    pub fn positive_amount(&self) -> Option<f64> {
        self.amount.filter(|a| *a > 0.0)
    }

    /// Claim amount: the parameter if positive, else the SKU price, else 0.
    pub fn amount_for(&self, sku: Option<&Sku>) -> f64 {
        self.positive_amount()
            .or_else(|| sku.map(|s| s.price).filter(|p| p.is_finite() && *p > 0.0))
            .unwrap_or(0.0)
    }

    /// Claim weight in grams: the parameter if positive, else the SKU weight, else 0.
    pub fn weight_for(&self, sku: Option<&Sku>) -> f64 {
        self.weight
            .filter(|w| *w > 0.0)
            .or_else(|| sku.map(|s| s.weight_grams).filter(|w| w.is_finite() && *w > 0.0))
            .unwrap_or(0.0)
    }

    /// Multiplier: the parameter if positive, else the SKU's, else `default`.
    pub fn multiplier_for(&self, sku: Option<&Sku>, default: f64) -> f64 {
        self.multiplier
            .filter(|m| *m > 0.0)
            .or_else(|| sku.map(|s| s.multiplier).filter(|m| m.is_finite() && *m > 0.0))
            .unwrap_or(default)
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number(key: &str, value: &str) -> Option<f64> {
    let parsed = value.trim().replace(',', ".").parse::<f64>().ok();
    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 => Some(n),
        _ => {
            debug!(param = key, value, "dropping malformed numeric parameter");
            None
        }
    }
}
