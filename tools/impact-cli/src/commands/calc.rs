//! Impact calculator.

use anyhow::{bail, Result};
use impact_commerce::impact::{calculate_impact, calculate_weight_based_impact, grams_per_euro};

use super::CalcArgs;
use crate::context::Context;
use crate::output::format_eur;

/// Run the calc command.
pub async fn run(args: CalcArgs, ctx: &Context) -> Result<()> {
    let settings = ctx.settings();
    let price_per_kg = args.price_per_kg.unwrap_or_else(|| settings.price_per_kg());

    match (args.amount, args.weight) {
        (Some(amount), _) => {
            let impact = calculate_impact(amount, price_per_kg, settings.certification_threshold());

            if ctx.output.is_json() {
                ctx.output.json(&impact);
                return Ok(());
            }

            ctx.output.header(&format!("Impact of {}", format_eur(impact.amount)));
            ctx.output.kv("Impact", &impact.display_value);
            ctx.output.kv("Kilograms", &format!("{:.3}", impact.impact_kg));
            ctx.output.kv(
                "Threshold",
                &format!(
                    "{:.0}% of {}",
                    impact.threshold_progress,
                    format_eur(settings.certification_threshold())
                ),
            );
            if impact.below_threshold {
                ctx.output.info("Below the certification threshold");
            }
        }
        (None, Some(weight)) => {
            let multiplier = args
                .multiplier
                .unwrap_or_else(|| settings.default_multiplier());
            let impact = calculate_weight_based_impact(weight, multiplier, price_per_kg);

            if ctx.output.is_json() {
                ctx.output.json(&impact);
                return Ok(());
            }

            ctx.output.header(&format!(
                "Impact of {:.0} g x {}",
                weight, impact.multiplier
            ));
            ctx.output.kv("Impact", &impact.display_value);
            ctx.output.kv("Merchant cost", &format_eur(impact.merchant_cost));
        }
        (None, None) => bail!("Pass --amount or --weight"),
    }

    ctx.output.kv(
        "Rate",
        &format!("{:.0} g per EUR", grams_per_euro(price_per_kg)),
    );

    Ok(())
}
