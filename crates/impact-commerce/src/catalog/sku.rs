//! SKU definitions.

use crate::ids::{MerchantId, PartnerId};
use serde::{Deserialize, Serialize};

/// SKU codes with this prefix route to the admin landing flow.
pub const ADMIN_SKU_PREFIX: &str = "ADMIN-";

/// How a SKU's impact is acquired by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Merchant already paid; the customer claims the impact.
    #[default]
    Claim,
    /// Customer pays directly.
    Pay,
    /// Customer redeems a gift code.
    GiftCard,
    /// Partner allocates impact from an e-commerce order.
    Allocation,
    /// Anything the back office stored that we don't know about.
    #[serde(other)]
    Unrecognized,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Claim => "CLAIM",
            PaymentMode::Pay => "PAY",
            PaymentMode::GiftCard => "GIFT_CARD",
            PaymentMode::Allocation => "ALLOCATION",
            PaymentMode::Unrecognized => "UNRECOGNIZED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "CLAIM" => PaymentMode::Claim,
            "PAY" => PaymentMode::Pay,
            "GIFT_CARD" => PaymentMode::GiftCard,
            "ALLOCATION" => PaymentMode::Allocation,
            _ => PaymentMode::Unrecognized,
        }
    }
}

/// A stock keeping unit that a landing page can be opened for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    /// Unique SKU code, as it appears in the `sku` URL parameter.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Acquisition flow for this SKU.
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Price in EUR.
    #[serde(default)]
    pub price: f64,
    /// Product weight in grams (weight-based claims).
    #[serde(default)]
    pub weight_grams: f64,
    /// Impact multiplier applied to the weight.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Customer must pay even if the mode says otherwise.
    #[serde(default)]
    pub payment_required: bool,
    /// Customer must validate a code even if the mode says otherwise.
    #[serde(default)]
    pub validation_required: bool,
    /// Whether the SKU can be resolved from a landing URL.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Merchant that funds claims on this SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<MerchantId>,
    /// Partner that allocates impact on this SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<PartnerId>,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Sku {
    /// Create a new active SKU.
    pub fn new(code: impl Into<String>, payment_mode: PaymentMode) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            payment_mode,
            price: 0.0,
            weight_grams: 0.0,
            multiplier: default_multiplier(),
            payment_required: false,
            validation_required: false,
            active: true,
            merchant_id: None,
            partner_id: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_weight(mut self, weight_grams: f64, multiplier: f64) -> Self {
        self.weight_grams = weight_grams;
        self.multiplier = multiplier;
        self
    }

    pub fn with_merchant(mut self, merchant_id: impl Into<MerchantId>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    pub fn with_partner(mut self, partner_id: impl Into<PartnerId>) -> Self {
        self.partner_id = Some(partner_id.into());
        self
    }

    /// Check if this SKU routes to the admin flow.
    pub fn is_admin(&self) -> bool {
        self.code.starts_with(ADMIN_SKU_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_creation() {
        let sku = Sku::new("BOTTLE-500", PaymentMode::Claim).with_weight(25.0, 2.0);
        assert_eq!(sku.code, "BOTTLE-500");
        assert!(sku.active);
        assert_eq!(sku.weight_grams, 25.0);
        assert_eq!(sku.multiplier, 2.0);
        assert!(!sku.is_admin());
    }

    #[test]
    fn test_admin_prefix() {
        assert!(Sku::new("ADMIN-CREDIT", PaymentMode::Pay).is_admin());
        assert!(!Sku::new("admin-credit", PaymentMode::Pay).is_admin());
    }

    #[test]
    fn test_payment_mode_from_str() {
        assert_eq!(PaymentMode::from_str("gift_card"), PaymentMode::GiftCard);
        assert_eq!(PaymentMode::from_str("SUBSCRIPTION"), PaymentMode::Unrecognized);
    }

    #[test]
    fn test_sku_deserialize_defaults() {
        let sku: Sku = serde_json::from_str(
            r#"{"code": "GIFT-10", "paymentMode": "GIFT_CARD", "price": 10}"#,
        )
        .unwrap();
        assert_eq!(sku.payment_mode, PaymentMode::GiftCard);
        assert_eq!(sku.multiplier, 1.0);
        assert!(sku.active);
        assert!(!sku.validation_required);
    }

    #[test]
    fn test_unknown_payment_mode_deserializes() {
        let sku: Sku =
            serde_json::from_str(r#"{"code": "X", "paymentMode": "BARTER"}"#).unwrap();
        assert_eq!(sku.payment_mode, PaymentMode::Unrecognized);
    }
}
