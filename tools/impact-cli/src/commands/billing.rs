//! Monthly billing statements.

use anyhow::{Context as _, Result};
use chrono::Utc;
use impact_commerce::billing::{generate_statements, BillingPeriod};
use impact_commerce::money::{Currency, Money};

use super::BillingArgs;
use crate::context::Context;
use crate::store;

/// Run the billing command.
pub async fn run(args: BillingArgs, ctx: &Context) -> Result<()> {
    let period = match args.period.as_deref() {
        Some(period) => BillingPeriod::parse(period)?,
        None => BillingPeriod::from_timestamp(Utc::now().timestamp())
            .context("System clock is out of range")?
            .previous(),
    };

    let settings = ctx.settings();
    let transactions = store::load_transactions(ctx)?;
    let statements = generate_statements(&transactions, period, &settings)?;

    if ctx.output.is_json() {
        ctx.output.json(&statements);
        return Ok(());
    }

    ctx.output.header(&format!("Billing {}", period));

    if statements.is_empty() {
        ctx.output.info("No billable transactions in this period.");
        return Ok(());
    }

    ctx.output.table_row(
        &["PARTY", "TXNS", "IMPACT", "FEES", "BILLED"],
        &[28, 6, 12, 10, 10],
    );
    ctx.output.info(&"-".repeat(74));

    for statement in &statements {
        let billed = if statement.minimum_applied() {
            format!("{}*", statement.billed)
        } else {
            statement.billed.to_string()
        };
        ctx.output.table_row(
            &[
                &statement.party.to_string(),
                &statement.transaction_count.to_string(),
                &format!("{:.2} kg", statement.impact_kg),
                &statement.fees.to_string(),
                &billed,
            ],
            &[28, 6, 12, 10, 10],
        );
    }

    let total = Money::sum(statements.iter().map(|s| &s.billed), Currency::EUR)?;
    ctx.output.info("");
    ctx.output.info(&format!("Total billed: {}", total));
    if statements.iter().any(|s| s.minimum_applied()) {
        ctx.output.info(&format!(
            "* raised to the monthly minimum of {}",
            Money::from_decimal(settings.monthly_billing_minimum(), Currency::EUR)
        ));
    }

    Ok(())
}
