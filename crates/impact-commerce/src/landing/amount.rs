//! EUR amount resolution per landing case.

use crate::catalog::Sku;
use crate::impact::calculate_weight_based_impact;
use crate::landing::{LandingCase, LandingParams};
use crate::settings::Settings;

/// The EUR amount a landing page is about.
///
/// | Case | Amount |
/// |---|---|
/// | A | merchant cost of the claimed weight |
/// | B, C, E | `amount` parameter, else SKU price |
/// | D | SKU price |
/// | F, Admin | `amount` parameter, else zero |
pub fn calculate_amount(
    case: LandingCase,
    sku: Option<&Sku>,
    params: &LandingParams,
    settings: &Settings,
) -> f64 {
    match case {
        LandingCase::A => {
            let weight = params.weight_for(sku);
            let multiplier = params.multiplier_for(sku, settings.default_multiplier());
            calculate_weight_based_impact(weight, multiplier, settings.price_per_kg())
                .merchant_cost
        }
        LandingCase::B | LandingCase::C | LandingCase::E => params.amount_for(sku),
        LandingCase::D => sku
            .map(|s| s.price)
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0),
        LandingCase::F | LandingCase::Admin => params.positive_amount().unwrap_or(0.0),
    }
}
