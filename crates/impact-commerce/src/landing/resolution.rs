//! End-to-end landing page resolution.

use crate::catalog::{Sku, SkuCatalog};
use crate::ids::{MerchantId, PartnerId};
use crate::impact::{calculate_impact, calculate_weight_based_impact, ImpactCalculation};
use crate::landing::{
    calculate_amount, determine_form_type, determine_landing_case, get_landing_message, FormType,
    LandingCase, LandingMessage, LandingParams, MessageContext,
};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything a landing page needs to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingResolution {
    pub case: LandingCase,
    pub form_type: FormType,
    /// Code of the resolved SKU, if any.
    pub sku_code: Option<String>,
    /// Merchant funding the claim, from the URL or the SKU.
    pub merchant_id: Option<MerchantId>,
    /// Partner behind an allocation, from the URL or the SKU.
    pub partner_id: Option<PartnerId>,
    /// Amount in EUR.
    pub amount: f64,
    pub impact: ImpactCalculation,
    pub message: LandingMessage,
    pub params: LandingParams,
}

/// Resolve a landing URL against the catalog and settings.
///
/// Never fails: an unknown or inactive SKU yields case F, and unusable
/// numbers yield a zero amount.
pub fn resolve_landing(
    catalog: &SkuCatalog,
    settings: &Settings,
    params: LandingParams,
) -> LandingResolution {
    let sku = params.sku.as_deref().and_then(|code| catalog.resolve(code));
    if sku.is_none() && params.sku.is_some() {
        debug!(sku = ?params.sku, "landing SKU not resolvable");
    }

    let case = determine_landing_case(sku, &params);
    let amount = calculate_amount(case, sku, &params, settings);
    let impact = impact_for(case, sku, &params, amount, settings);
    let form_type = determine_form_type(case, amount, settings.certification_threshold());

    let merchant_id = params
        .merchant
        .as_deref()
        .map(MerchantId::new)
        .or_else(|| sku.and_then(|s| s.merchant_id.clone()));
    let partner_id = params
        .partner
        .as_deref()
        .map(PartnerId::new)
        .or_else(|| sku.and_then(|s| s.partner_id.clone()));

    let message = get_landing_message(
        case,
        &MessageContext {
            name: params.name.as_deref(),
            merchant: merchant_id.as_ref().map(MerchantId::as_str),
            partner: partner_id.as_ref().map(PartnerId::as_str),
            amount,
            impact_display: &impact.display_value,
            price_per_kg: settings.price_per_kg(),
        },
    );

    debug!(case = %case, amount, form = form_type.as_str(), "landing resolved");

    LandingResolution {
        case,
        form_type,
        sku_code: sku.map(|s| s.code.clone()),
        merchant_id,
        partner_id,
        amount,
        impact,
        message,
        params,
    }
}

/// Weight-based claims report the weight figures directly so the display
/// does not pick up noise from dividing the cost back by the price.
fn impact_for(
    case: LandingCase,
    sku: Option<&Sku>,
    params: &LandingParams,
    amount: f64,
    settings: &Settings,
) -> ImpactCalculation {
    let mut impact = calculate_impact(
        amount,
        settings.price_per_kg(),
        settings.certification_threshold(),
    );

    if case == LandingCase::A {
        let weight = calculate_weight_based_impact(
            params.weight_for(sku),
            params.multiplier_for(sku, settings.default_multiplier()),
            settings.price_per_kg(),
        );
        impact.impact_kg = weight.impact_kg;
        impact.impact_grams = weight.impact_grams;
        impact.display_value = weight.display_value;
    }

    impact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PaymentMode;

    fn catalog() -> SkuCatalog {
        let mut inactive = Sku::new("OLD-1", PaymentMode::Pay).with_price(5.0);
        inactive.active = false;

        SkuCatalog::from_skus([
            Sku::new("BOTTLE", PaymentMode::Claim)
                .with_weight(2500.0, 2.0)
                .with_merchant("Acme"),
            Sku::new("PAY-11", PaymentMode::Pay).with_price(11.0),
            Sku::new("GIFT-10", PaymentMode::GiftCard).with_price(10.0),
            inactive,
        ])
        .unwrap()
    }

    #[test]
    fn test_weight_claim() {
        let resolution = resolve_landing(
            &catalog(),
            &Settings::default(),
            LandingParams::from_query("sku=BOTTLE&name=Ana"),
        );
        assert_eq!(resolution.case, LandingCase::A);
        assert_eq!(resolution.form_type, FormType::Minimal);
        assert_eq!(resolution.impact.impact_kg, 5.0);
        assert_eq!(resolution.impact.display_value, "5.00 kg");
        assert!((resolution.amount - 0.55).abs() < 1e-12);
        assert_eq!(resolution.message.title, "Thank you, Ana!");
        assert!(resolution.message.body.starts_with("Acme has funded"));
        assert_eq!(resolution.merchant_id, Some(MerchantId::new("Acme")));
    }

    #[test]
    fn test_payment_at_threshold_needs_full_form() {
        let resolution = resolve_landing(
            &catalog(),
            &Settings::default(),
            LandingParams::from_query("sku=PAY-11"),
        );
        assert_eq!(resolution.case, LandingCase::C);
        assert_eq!(resolution.amount, 11.0);
        assert_eq!(resolution.form_type, FormType::Full);
        assert_eq!(resolution.impact.display_value, "100.00 kg");
    }

    #[test]
    fn test_gift_card() {
        let resolution = resolve_landing(
            &catalog(),
            &Settings::default(),
            LandingParams::from_query("sku=GIFT-10&code=ABC123"),
        );
        assert_eq!(resolution.case, LandingCase::D);
        assert_eq!(resolution.form_type, FormType::Full);
        assert_eq!(resolution.params.code.as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_inactive_or_unknown_sku_degrades_to_general() {
        for query in ["sku=OLD-1", "sku=MISSING", "", "amount=oops"] {
            let resolution =
                resolve_landing(&catalog(), &Settings::default(), LandingParams::from_query(query));
            assert_eq!(resolution.case, LandingCase::F);
            assert_eq!(resolution.amount, 0.0);
            assert_eq!(resolution.sku_code, None);
            assert_eq!(resolution.form_type, FormType::Standard);
        }
    }

    #[test]
    fn test_partner_param_routes_to_allocation() {
        let resolution = resolve_landing(
            &catalog(),
            &Settings::default(),
            LandingParams::from_query("sku=PAY-11&partner=Shop%20Co&amount=2"),
        );
        assert_eq!(resolution.case, LandingCase::E);
        assert_eq!(resolution.amount, 2.0);
        assert_eq!(
            resolution.message.body,
            "Shop Co has allocated 18.18 kg of plastic recovery to you."
        );
        assert_eq!(resolution.partner_id, Some(PartnerId::new("Shop Co")));
    }
}
