//! Resolve a landing URL.

use anyhow::{bail, Result};
use chrono::Utc;
use impact_commerce::ids::UserId;
use impact_commerce::landing::{resolve_landing, LandingCase, LandingParams, LandingResolution};
use impact_commerce::wallet::{Certificate, Transaction};
use serde::Serialize;

use super::LandingArgs;
use crate::context::Context;
use crate::output::{case_badge, format_eur};
use crate::store;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LandingReport {
    resolution: LandingResolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<Certificate>,
}

/// Run the landing command.
pub async fn run(args: LandingArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let settings = ctx.settings();

    let params = LandingParams::from_query(&args.url);
    let resolution = resolve_landing(&catalog, &settings, params);

    let mut report = LandingReport {
        resolution,
        transaction: None,
        certificate: None,
    };

    if let Some(user) = args.record {
        let (tx, certificate) = record(&report.resolution, UserId::new(user), ctx)?;
        report.transaction = Some(tx);
        report.certificate = certificate;
    }

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    print_resolution(&report.resolution, ctx);

    if let Some(tx) = &report.transaction {
        ctx.output.info("");
        ctx.output.success(&format!(
            "Recorded {} for {} ({})",
            format_eur(tx.amount),
            tx.user_id,
            tx.flow.as_str()
        ));
    }
    if let Some(certificate) = &report.certificate {
        ctx.output.success(&format!(
            "Certificate {} issued: {} / {:.2} kg",
            certificate.id,
            format_eur(certificate.amount),
            certificate.impact_kg
        ));
    }

    Ok(())
}

fn print_resolution(resolution: &LandingResolution, ctx: &Context) {
    ctx.output.header(&format!("Landing case {}", resolution.case));

    ctx.output.kv(
        "Case",
        &format!(
            "{} ({})",
            case_badge(resolution.case),
            resolution.case.flow().as_str()
        ),
    );
    ctx.output.kv("Form", resolution.form_type.as_str());
    ctx.output
        .kv("SKU", resolution.sku_code.as_deref().unwrap_or("-"));
    if let Some(merchant) = &resolution.merchant_id {
        ctx.output.kv("Merchant", merchant.as_str());
    }
    if let Some(partner) = &resolution.partner_id {
        ctx.output.kv("Partner", partner.as_str());
    }
    ctx.output.kv("Amount", &format_eur(resolution.amount));
    ctx.output.kv("Impact", &resolution.impact.display_value);
    ctx.output.kv(
        "Progress",
        &format!("{:.0}%", resolution.impact.threshold_progress),
    );

    ctx.output.info("");
    ctx.output.info(&resolution.message.title);
    ctx.output.info(&resolution.message.body);
    ctx.output.list_item(&resolution.message.cta);

    if ctx.output.is_verbose() {
        ctx.output.info("");
        ctx.output.info("Parameters:");
        let params = &resolution.params;
        for (key, value) in [
            ("sku", params.sku.as_deref()),
            ("name", params.name.as_deref()),
            ("email", params.email.as_deref()),
            ("merchant", params.merchant.as_deref()),
            ("partner", params.partner.as_deref()),
            ("code", params.code.as_deref()),
        ] {
            if let Some(value) = value {
                ctx.output.kv(key, value);
            }
        }
    }
}

/// Credit the landing outcome to a customer. Gift card landings consume
/// the code from the URL.
fn record(
    resolution: &LandingResolution,
    user_id: UserId,
    ctx: &Context,
) -> Result<(Transaction, Option<Certificate>)> {
    if resolution.amount <= 0.0 {
        bail!("Nothing to record: landing case {} has no amount", resolution.case);
    }

    let now = Utc::now().timestamp();
    let settings = ctx.settings();
    let tx = Transaction::from_resolution(resolution, user_id, now);

    if resolution.case != LandingCase::D {
        let certificate = store::record_transaction(ctx, &settings, tx.clone())?;
        return Ok((tx, certificate));
    }

    let Some(code) = resolution.params.code.as_deref() else {
        bail!("Gift card landing has no code parameter");
    };
    let ledger = store::load_ledger(ctx)?;
    let gift = ledger.get(code)?;
    if Some(gift.sku_code.as_str()) != resolution.sku_code.as_deref() {
        bail!(
            "Gift code {} redeems {}, not {}",
            gift.code,
            gift.sku_code,
            resolution.sku_code.as_deref().unwrap_or("-")
        );
    }
    let (_, certificate) = store::redeem_gift_code(ctx, &settings, ledger, code, tx.clone())?;
    Ok((tx, certificate))
}
