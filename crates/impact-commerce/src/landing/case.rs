//! Landing case classification.

use crate::catalog::{PaymentMode, Sku, ADMIN_SKU_PREFIX};
use crate::landing::LandingParams;
use crate::wallet::AcquisitionFlow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The landing-page flow to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandingCase {
    /// Merchant-funded claim, usually weight based.
    A,
    /// Merchant-funded claim of a fixed amount.
    B,
    /// Direct payment.
    C,
    /// Gift card redemption.
    D,
    /// Partner allocation from an e-commerce order.
    E,
    /// General contribution.
    F,
    /// Back-office credit.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl LandingCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingCase::A => "A",
            LandingCase::B => "B",
            LandingCase::C => "C",
            LandingCase::D => "D",
            LandingCase::E => "E",
            LandingCase::F => "F",
            LandingCase::Admin => "ADMIN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(LandingCase::A),
            "B" => Some(LandingCase::B),
            "C" => Some(LandingCase::C),
            "D" => Some(LandingCase::D),
            "E" => Some(LandingCase::E),
            "F" => Some(LandingCase::F),
            "ADMIN" => Some(LandingCase::Admin),
            _ => None,
        }
    }

    /// How impact gained through this case is recorded in a wallet.
    pub fn flow(&self) -> AcquisitionFlow {
        match self {
            LandingCase::A | LandingCase::B => AcquisitionFlow::MerchantClaim,
            LandingCase::C => AcquisitionFlow::DirectPayment,
            LandingCase::D => AcquisitionFlow::GiftCardRedemption,
            LandingCase::E => AcquisitionFlow::Allocation,
            LandingCase::F => AcquisitionFlow::Contribution,
            LandingCase::Admin => AcquisitionFlow::AdminCredit,
        }
    }

    /// Merchant-funded claim cases.
    pub fn is_claim(&self) -> bool {
        matches!(self, LandingCase::A | LandingCase::B)
    }
}

impl fmt::Display for LandingCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the landing flow for a SKU and URL parameters.
///
/// Rules are checked in order and the first match wins:
///
/// 1. an `ADMIN-` SKU code goes to [`LandingCase::Admin`];
/// 2. no resolvable SKU goes to [`LandingCase::F`];
/// 3. allocation SKUs, or any `partner` parameter, go to [`LandingCase::E`];
/// 4. gift card SKUs, or SKUs requiring validation, go to [`LandingCase::D`];
/// 5. pay SKUs, or SKUs requiring payment, go to [`LandingCase::C`];
/// 6. claim SKUs go to [`LandingCase::A`] with a weight, [`LandingCase::B`]
///    with an amount, and [`LandingCase::A`] otherwise;
/// 7. everything else goes to [`LandingCase::F`].
pub fn determine_landing_case(sku: Option<&Sku>, params: &LandingParams) -> LandingCase {
    let code = sku.map(|s| s.code.as_str()).or(params.sku.as_deref());
    if code.is_some_and(|c| c.starts_with(ADMIN_SKU_PREFIX)) {
        return LandingCase::Admin;
    }

    let Some(sku) = sku else {
        return LandingCase::F;
    };

    if sku.payment_mode == PaymentMode::Allocation || params.partner.is_some() {
        return LandingCase::E;
    }

    if sku.payment_mode == PaymentMode::GiftCard || sku.validation_required {
        return LandingCase::D;
    }

    if sku.payment_mode == PaymentMode::Pay || sku.payment_required {
        return LandingCase::C;
    }

    if sku.payment_mode == PaymentMode::Claim {
        if params.weight_for(Some(sku)) > 0.0 {
            return LandingCase::A;
        }
        if params.amount_for(Some(sku)) > 0.0 {
            return LandingCase::B;
        }
        return LandingCase::A;
    }

    LandingCase::F
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> Sku {
        Sku::new("CLAIM-1", PaymentMode::Claim)
    }

    #[test]
    fn test_claim_without_weight_or_amount_defaults_to_a() {
        let case = determine_landing_case(Some(&claim()), &LandingParams::for_sku("CLAIM-1"));
        assert_eq!(case, LandingCase::A);
    }

    #[test]
    fn test_claim_with_weight_is_a() {
        let sku = claim().with_weight(250.0, 1.0).with_price(5.0);
        let case = determine_landing_case(Some(&sku), &LandingParams::default());
        assert_eq!(case, LandingCase::A);

        let params = LandingParams::default().with_weight(100.0).with_amount(5.0);
        assert_eq!(determine_landing_case(Some(&claim()), &params), LandingCase::A);
    }

    #[test]
    fn test_claim_with_amount_is_b() {
        let sku = claim().with_price(2.0);
        assert_eq!(
            determine_landing_case(Some(&sku), &LandingParams::default()),
            LandingCase::B
        );

        let params = LandingParams::default().with_amount(3.0);
        assert_eq!(determine_landing_case(Some(&claim()), &params), LandingCase::B);
    }

    #[test]
    fn test_no_sku_is_f() {
        assert_eq!(
            determine_landing_case(None, &LandingParams::for_sku("UNKNOWN")),
            LandingCase::F
        );
        assert_eq!(
            determine_landing_case(None, &LandingParams::default()),
            LandingCase::F
        );
    }

    #[test]
    fn test_admin_prefix_wins() {
        let sku = Sku::new("ADMIN-GIFT", PaymentMode::GiftCard);
        let params = LandingParams::default().with_partner("shop");
        assert_eq!(determine_landing_case(Some(&sku), &params), LandingCase::Admin);

        // An unresolved admin code still routes to the admin flow.
        assert_eq!(
            determine_landing_case(None, &LandingParams::for_sku("ADMIN-CREDIT")),
            LandingCase::Admin
        );
    }

    #[test]
    fn test_partner_param_beats_payment_mode() {
        let sku = Sku::new("GIFT-1", PaymentMode::GiftCard);
        let params = LandingParams::default().with_partner("shop");
        assert_eq!(determine_landing_case(Some(&sku), &params), LandingCase::E);

        let sku = Sku::new("ALLOC-1", PaymentMode::Allocation);
        assert_eq!(
            determine_landing_case(Some(&sku), &LandingParams::default()),
            LandingCase::E
        );
    }

    #[test]
    fn test_validation_beats_payment() {
        let mut sku = Sku::new("PAY-1", PaymentMode::Pay);
        sku.validation_required = true;
        assert_eq!(
            determine_landing_case(Some(&sku), &LandingParams::default()),
            LandingCase::D
        );
    }

    #[test]
    fn test_payment_required_claim_is_c() {
        let mut sku = claim().with_weight(100.0, 1.0);
        sku.payment_required = true;
        assert_eq!(
            determine_landing_case(Some(&sku), &LandingParams::default()),
            LandingCase::C
        );
        assert_eq!(
            determine_landing_case(
                Some(&Sku::new("PAY-1", PaymentMode::Pay)),
                &LandingParams::default()
            ),
            LandingCase::C
        );
    }

    #[test]
    fn test_unrecognized_mode_falls_back_to_f() {
        let sku = Sku::new("ODD-1", PaymentMode::Unrecognized);
        assert_eq!(
            determine_landing_case(Some(&sku), &LandingParams::default()),
            LandingCase::F
        );
    }

    #[test]
    fn test_case_strings() {
        assert_eq!(LandingCase::from_str("admin"), Some(LandingCase::Admin));
        assert_eq!(LandingCase::from_str("g"), None);
        assert_eq!(LandingCase::D.to_string(), "D");
        assert_eq!(LandingCase::B.flow(), AcquisitionFlow::MerchantClaim);
    }
}
