//! Impact transactions.

use crate::ids::{MerchantId, PartnerId, TransactionId, UserId};
use crate::landing::LandingResolution;
use serde::{Deserialize, Serialize};

/// How the customer acquired the impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionFlow {
    /// Merchant-funded claim.
    MerchantClaim,
    /// Customer paid directly.
    DirectPayment,
    /// Gift code redeemed.
    GiftCardRedemption,
    /// Partner allocation from an e-commerce order.
    Allocation,
    /// Free-form contribution.
    Contribution,
    /// Credited from the back office.
    AdminCredit,
}

impl AcquisitionFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionFlow::MerchantClaim => "merchant_claim",
            AcquisitionFlow::DirectPayment => "direct_payment",
            AcquisitionFlow::GiftCardRedemption => "gift_card_redemption",
            AcquisitionFlow::Allocation => "allocation",
            AcquisitionFlow::Contribution => "contribution",
            AcquisitionFlow::AdminCredit => "admin_credit",
        }
    }
}

/// A credit of impact to a customer's wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub flow: AcquisitionFlow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_code: Option<String>,
    /// Amount in EUR.
    pub amount: f64,
    pub impact_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<MerchantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<PartnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_code: Option<String>,
    /// Unix timestamp.
    pub created_at: i64,
}

impl Transaction {
    /// Create a transaction with no merchant, partner or SKU attached.
    pub fn new(
        user_id: UserId,
        flow: AcquisitionFlow,
        amount: f64,
        impact_kg: f64,
        created_at: i64,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            flow,
            sku_code: None,
            amount,
            impact_kg,
            merchant_id: None,
            partner_id: None,
            gift_code: None,
            created_at,
        }
    }

    /// Record the outcome of a landing page for a customer.
    pub fn from_resolution(resolution: &LandingResolution, user_id: UserId, created_at: i64) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            flow: resolution.case.flow(),
            sku_code: resolution.sku_code.clone(),
            amount: resolution.amount,
            impact_kg: resolution.impact.impact_kg,
            merchant_id: resolution.merchant_id.clone(),
            partner_id: resolution.partner_id.clone(),
            gift_code: resolution.params.code.clone(),
            created_at,
        }
    }

    pub fn with_merchant(mut self, merchant_id: impl Into<MerchantId>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    pub fn with_partner(mut self, partner_id: impl Into<PartnerId>) -> Self {
        self.partner_id = Some(partner_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PaymentMode, Sku, SkuCatalog};
    use crate::landing::{resolve_landing, LandingParams};
    use crate::settings::Settings;

    #[test]
    fn test_from_resolution() {
        let catalog = SkuCatalog::from_skus([Sku::new("ALLOC-1", PaymentMode::Allocation)
            .with_price(1.1)
            .with_partner("shop-co")])
        .unwrap();
        let resolution = resolve_landing(
            &catalog,
            &Settings::default(),
            LandingParams::from_query("sku=ALLOC-1"),
        );

        let tx = Transaction::from_resolution(&resolution, UserId::new("usr-1"), 1_700_000_000);
        assert_eq!(tx.flow, AcquisitionFlow::Allocation);
        assert_eq!(tx.partner_id, Some(PartnerId::new("shop-co")));
        assert_eq!(tx.sku_code.as_deref(), Some("ALLOC-1"));
        assert!((tx.impact_kg - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_flow_serialization() {
        assert_eq!(
            serde_json::to_string(&AcquisitionFlow::GiftCardRedemption).unwrap(),
            "\"gift_card_redemption\""
        );
    }
}
