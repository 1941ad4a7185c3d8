//! Impact calculation.
//!
//! Converts EUR amounts or product weights into kilograms of recovered
//! plastic. All arithmetic is plain `f64`; the only rounding happens when a
//! gram figure is rendered for display.

use crate::settings::DEFAULT_PRICE_PER_KG;
use serde::{Deserialize, Serialize};

/// Grams at which the display switches to kilograms (inclusive).
pub const KG_DISPLAY_THRESHOLD_GRAMS: f64 = 1000.0;

/// Result of converting an amount into impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactCalculation {
    /// Amount in EUR after sanitizing.
    pub amount: f64,
    /// Impact in kilograms.
    pub impact_kg: f64,
    /// Impact in grams.
    pub impact_grams: f64,
    /// Human readable impact, e.g. "455g" or "100.00 kg".
    pub display_value: String,
    /// Whether the amount is below the certification threshold.
    pub below_threshold: bool,
    /// Progress towards the threshold, 0-100.
    pub threshold_progress: f64,
}

/// Result of converting a product weight into impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightImpact {
    pub weight_kg: f64,
    pub multiplier: f64,
    pub impact_kg: f64,
    pub impact_grams: f64,
    /// What the merchant pays for this impact, in EUR.
    pub merchant_cost: f64,
    pub display_value: String,
}

/// Convert an EUR amount into impact.
///
/// A price that is zero, negative or not a number falls back to
/// [`DEFAULT_PRICE_PER_KG`]. A negative or non-finite amount counts as zero.
///
/// ```
/// use impact_commerce::impact::calculate_impact;
/// let impact = calculate_impact(11.0, 0.11, 10.0);
/// assert_eq!(impact.impact_kg, 100.0);
/// assert_eq!(impact.display_value, "100.00 kg");
/// ```
pub fn calculate_impact(amount: f64, price_per_kg: f64, threshold: f64) -> ImpactCalculation {
    let amount = sanitize_non_negative(amount, 0.0);
    let price = effective_price(price_per_kg);

    let impact_kg = amount / price;
    let impact_grams = impact_kg * 1000.0;

    ImpactCalculation {
        amount,
        impact_kg,
        impact_grams,
        display_value: format_impact_grams(impact_grams),
        below_threshold: amount < threshold,
        threshold_progress: threshold_progress(amount, threshold),
    }
}

/// Convert a product weight into impact and merchant cost.
pub fn calculate_weight_based_impact(
    weight_grams: f64,
    multiplier: f64,
    price_per_kg: f64,
) -> WeightImpact {
    let weight_kg = sanitize_non_negative(weight_grams, 0.0) / 1000.0;
    let multiplier = sanitize_non_negative(multiplier, 1.0);
    let price = effective_price(price_per_kg);

    let impact_kg = weight_kg * multiplier;
    let impact_grams = impact_kg * 1000.0;

    WeightImpact {
        weight_kg,
        multiplier,
        impact_kg,
        impact_grams,
        merchant_cost: weight_kg * price * multiplier,
        display_value: format_impact_grams(impact_grams),
    }
}

/// Render an impact given in grams.
///
/// Below 1000 g the value is rounded half away from zero to whole grams
/// ("455g"); from 1000 g up it is shown in kilograms with two decimals
/// ("1.00 kg"). The comparison uses the unrounded value, so 999.9 g
/// displays as "1000g".
pub fn format_impact_grams(grams: f64) -> String {
    if grams >= KG_DISPLAY_THRESHOLD_GRAMS {
        format!("{:.2} kg", grams / 1000.0)
    } else {
        format!("{}g", grams.round() as i64)
    }
}

/// Grams of plastic recovered per euro at the given price.
pub fn grams_per_euro(price_per_kg: f64) -> f64 {
    1000.0 / effective_price(price_per_kg)
}

/// Percentage of the threshold reached, capped at 100.
pub fn threshold_progress(amount: f64, threshold: f64) -> f64 {
    if threshold.is_nan() || threshold <= 0.0 {
        return if amount > 0.0 { 100.0 } else { 0.0 };
    }
    (amount / threshold * 100.0).min(100.0)
}

/// The price actually used for division; never zero.
pub fn effective_price(price_per_kg: f64) -> f64 {
    if price_per_kg.is_finite() && price_per_kg > 0.0 {
        price_per_kg
    } else {
        tracing::debug!(price_per_kg, "falling back to default price per kg");
        DEFAULT_PRICE_PER_KG
    }
}

fn sanitize_non_negative(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_euros_is_one_hundred_kg() {
        let impact = calculate_impact(11.0, 0.11, 10.0);
        assert_eq!(impact.impact_kg, 100.0);
        assert_eq!(impact.impact_grams, 100_000.0);
        assert_eq!(impact.display_value, "100.00 kg");
        assert!(!impact.below_threshold);
        assert_eq!(impact.threshold_progress, 100.0);
    }

    #[test]
    fn test_gram_display() {
        let impact = calculate_impact(0.05, 0.11, 10.0);
        assert!((impact.impact_grams - 454.5).abs() < 0.1);
        assert_eq!(impact.display_value, "455g");
        assert!(impact.below_threshold);
        assert!((impact.threshold_progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_half_euro_shows_kilograms() {
        let impact = calculate_impact(0.5, 0.11, 10.0);
        assert!((impact.impact_grams - 4545.45).abs() < 0.01);
        assert_eq!(impact.display_value, "4.55 kg");
    }

    #[test]
    fn test_kg_boundary_is_inclusive() {
        let impact = calculate_impact(0.11, 0.11, 10.0);
        assert_eq!(impact.impact_grams, 1000.0);
        assert_eq!(impact.display_value, "1.00 kg");

        assert_eq!(format_impact_grams(999.4), "999g");
        assert_eq!(format_impact_grams(999.9), "1000g");
        assert_eq!(format_impact_grams(0.0), "0g");
        assert_eq!(format_impact_grams(0.5), "1g");
    }

    #[test]
    fn test_zero_price_falls_back() {
        let with_zero = calculate_impact(11.0, 0.0, 10.0);
        let with_default = calculate_impact(11.0, DEFAULT_PRICE_PER_KG, 10.0);
        assert_eq!(with_zero, with_default);

        let with_nan = calculate_impact(11.0, f64::NAN, 10.0);
        assert_eq!(with_nan.impact_kg, 100.0);
    }

    #[test]
    fn test_bad_amount_degrades_to_zero() {
        let impact = calculate_impact(-5.0, 0.11, 10.0);
        assert_eq!(impact.amount, 0.0);
        assert_eq!(impact.display_value, "0g");
        assert_eq!(impact.threshold_progress, 0.0);

        assert_eq!(calculate_impact(f64::INFINITY, 0.11, 10.0).amount, 0.0);
    }

    #[test]
    fn test_progress_never_exceeds_hundred() {
        for amount in [10.0, 10.01, 50.0, 1e9] {
            let impact = calculate_impact(amount, 0.11, 10.0);
            assert!(impact.threshold_progress <= 100.0);
        }
        assert_eq!(threshold_progress(5.0, 0.0), 100.0);
        assert_eq!(threshold_progress(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_weight_based_impact() {
        let impact = calculate_weight_based_impact(2500.0, 2.0, 0.11);
        assert_eq!(impact.weight_kg, 2.5);
        assert_eq!(impact.impact_kg, 5.0);
        assert_eq!(impact.display_value, "5.00 kg");
        assert!((impact.merchant_cost - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_weight_based_impact_small_item() {
        let impact = calculate_weight_based_impact(30.0, 1.0, 0.11);
        assert_eq!(impact.display_value, "30g");
        assert!((impact.merchant_cost - 0.0033).abs() < 1e-12);
    }

    #[test]
    fn test_weight_based_bad_multiplier() {
        let impact = calculate_weight_based_impact(1000.0, f64::NAN, 0.11);
        assert_eq!(impact.multiplier, 1.0);
        assert_eq!(impact.impact_kg, 1.0);
    }

    #[test]
    fn test_grams_per_euro() {
        assert!((grams_per_euro(0.11) - 9090.909).abs() < 0.001);
        assert_eq!(grams_per_euro(0.0), grams_per_euro(DEFAULT_PRICE_PER_KG));
    }
}
