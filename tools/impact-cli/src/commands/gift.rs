//! Gift code commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::Confirm;
use impact_commerce::gift::{
    generate_codes, parse_batch, BatchUpload, GiftCode, GiftCodeState, ImportSummary,
};
use impact_commerce::impact::{calculate_impact, format_impact_grams};
use impact_commerce::ids::{BatchId, UserId};
use impact_commerce::wallet::{AcquisitionFlow, Certificate, Transaction};

use super::{GiftArgs, GiftCommand};
use crate::context::Context;
use crate::output::{format_eur, format_timestamp, state_badge};
use crate::store;

const IMPORT_CHUNK: usize = 100;

/// Run the gift command.
pub async fn run(args: GiftArgs, ctx: &Context) -> Result<()> {
    match args.command {
        GiftCommand::Import { file, sku, batch } => {
            import_batch(&file, sku.as_deref(), batch, ctx).await
        }
        GiftCommand::Generate {
            sku,
            count,
            prefix,
            out,
        } => generate(&sku, count, &prefix, out.as_deref(), ctx).await,
        GiftCommand::List { status, limit } => list_codes(status.as_deref(), limit, ctx).await,
        GiftCommand::Redeem { code, user } => redeem(&code, &user, ctx).await,
        GiftCommand::Deactivate { code, yes } => deactivate(&code, yes, ctx).await,
        GiftCommand::Reactivate { code } => reactivate(&code, ctx).await,
    }
}

async fn import_batch(
    file: &str,
    default_sku: Option<&str>,
    batch: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let path = ctx.cwd.join(file);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;

    let batch_id = batch.map(BatchId::new).unwrap_or_else(BatchId::generate);
    let upload = parse_batch(&content, default_sku, batch_id, Utc::now().timestamp());

    ctx.output.header(&format!("Importing batch {}", upload.batch_id));
    warn_unknown_skus(&upload, ctx)?;

    for rejection in &upload.rejected {
        ctx.output.warn(&format!(
            "line {}: {} ({})",
            rejection.line, rejection.input, rejection.reason
        ));
    }

    let mut ledger = store::load_ledger(ctx)?;
    let rejected = upload.rejected.len();

    let pb = ctx.output.progress(upload.codes.len() as u64, "importing");
    let mut summary = ImportSummary::default();
    for chunk in upload.codes.chunks(IMPORT_CHUNK) {
        let imported = ledger.import(BatchUpload {
            batch_id: upload.batch_id.clone(),
            codes: chunk.to_vec(),
            rejected: Vec::new(),
        });
        summary.added += imported.added;
        summary.duplicates.extend(imported.duplicates);
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    store::save_ledger(ctx, ledger)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "batchId": upload.batch_id,
            "added": summary.added,
            "duplicates": summary.duplicates,
            "rejected": upload.rejected,
        }));
        return Ok(());
    }

    for code in &summary.duplicates {
        ctx.output.warn(&format!("{} already exists, skipped", code));
    }
    ctx.output.success(&format!(
        "Imported {} code(s), {} duplicate(s), {} rejected line(s)",
        summary.added,
        summary.duplicates.len(),
        rejected
    ));

    Ok(())
}

fn warn_unknown_skus(upload: &BatchUpload, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let mut unknown: Vec<&str> = upload
        .codes
        .iter()
        .map(|c| c.sku_code.as_str())
        .filter(|sku| catalog.get(sku).is_err())
        .collect();
    unknown.sort_unstable();
    unknown.dedup();

    for sku in unknown {
        ctx.output
            .warn(&format!("SKU {} is not in the catalog; codes will not resolve", sku));
    }
    Ok(())
}

async fn generate(
    sku: &str,
    count: usize,
    prefix: &str,
    out: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    ctx.catalog()?
        .get(sku)
        .with_context(|| format!("Cannot generate codes for {}", sku))?;

    let mut ledger = store::load_ledger(ctx)?;

    // Retry the rare collision with an existing code.
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        for code in generate_codes(prefix, count - codes.len())? {
            if ledger.get(&code).is_err() && !codes.contains(&code) {
                codes.push(code);
            }
        }
    }

    let batch_id = BatchId::generate();
    let now = Utc::now().timestamp();
    let summary = ledger.import(BatchUpload {
        batch_id: batch_id.clone(),
        codes: codes
            .iter()
            .map(|code| GiftCode::new(code.clone(), sku, now).with_batch(batch_id.clone()))
            .collect(),
        rejected: Vec::new(),
    });
    store::save_ledger(ctx, ledger)?;

    if let Some(out) = out {
        let path = ctx.cwd.join(out);
        let body: String = codes.iter().map(|c| format!("{},{}\n", c, sku)).collect();
        fs::write(&path, body)
            .with_context(|| format!("Failed to write codes: {}", path.display()))?;
        ctx.output.info(&format!("Wrote codes to {}", path.display()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "batchId": batch_id,
            "sku": sku,
            "codes": codes,
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Batch {}", batch_id));
    for code in &codes {
        ctx.output.list_item(code);
    }
    ctx.output
        .success(&format!("Generated {} code(s) for {}", summary.added, sku));

    Ok(())
}

async fn list_codes(status: Option<&str>, limit: Option<usize>, ctx: &Context) -> Result<()> {
    let filter = match status.map(|s| s.trim().to_lowercase()) {
        None => None,
        Some(s) => Some(match s.as_str() {
            "unused" => GiftCodeState::Unused,
            "used" => GiftCodeState::Used,
            "deactivated" => GiftCodeState::Deactivated,
            _ => bail!("Unknown status: {}. Available: unused, used, deactivated", s),
        }),
    };

    let ledger = store::load_ledger(ctx)?;
    let codes: Vec<&GiftCode> = ledger
        .iter()
        .filter(|c| filter.map_or(true, |state| c.state() == state))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&codes);
        return Ok(());
    }

    if codes.is_empty() {
        ctx.output.info("No gift codes found.");
        return Ok(());
    }

    ctx.output.header("Gift codes");
    ctx.output
        .table_row(&["CODE", "SKU", "STATUS", "USED BY", "USED AT"], &[24, 14, 12, 16, 20]);
    ctx.output.info(&"-".repeat(94));

    for code in &codes {
        let used_at = code.used_at().map(format_timestamp).unwrap_or_default();
        let used_by = code.used_by().map(|u| u.as_str()).unwrap_or("-");
        ctx.output.table_row(
            &[
                &code.code,
                &code.sku_code,
                &state_badge(code.state()),
                used_by,
                &used_at,
            ],
            &[24, 14, 12, 16, 20],
        );
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "Total: {} ({} unused, {} used, {} deactivated)",
        ledger.len(),
        ledger.count_by_state(GiftCodeState::Unused),
        ledger.count_by_state(GiftCodeState::Used),
        ledger.count_by_state(GiftCodeState::Deactivated),
    ));

    Ok(())
}

async fn redeem(code: &str, user: &str, ctx: &Context) -> Result<()> {
    let (gift, tx, certificate) =
        redeem_for_user(code, UserId::new(user), Utc::now().timestamp(), ctx)?;
    let amount = tx.amount;
    let impact = format_impact_grams(tx.impact_kg * 1000.0);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "giftCode": gift,
            "transaction": tx,
            "certificate": certificate,
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Redeemed {} for {}: {} ({})",
        gift.code,
        tx.user_id,
        format_eur(amount),
        impact
    ));
    if let Some(certificate) = certificate {
        ctx.output
            .success(&format!("Certificate {} issued", certificate.id));
    }

    Ok(())
}

/// Redeem a code and credit its SKU's price to the customer.
fn redeem_for_user(
    code: &str,
    user_id: UserId,
    now: i64,
    ctx: &Context,
) -> Result<(GiftCode, Transaction, Option<Certificate>)> {
    let settings = ctx.settings();
    let catalog = ctx.catalog()?;
    let ledger = store::load_ledger(ctx)?;

    let gift = ledger.get(code)?;
    let sku = catalog.resolve(&gift.sku_code).with_context(|| {
        format!("SKU {} for this gift code is unknown or inactive", gift.sku_code)
    })?;
    let impact = calculate_impact(
        sku.price,
        settings.price_per_kg(),
        settings.certification_threshold(),
    );

    let mut tx = Transaction::new(
        user_id,
        AcquisitionFlow::GiftCardRedemption,
        sku.price,
        impact.impact_kg,
        now,
    );
    tx.sku_code = Some(sku.code.clone());
    tx.gift_code = Some(gift.code.clone());

    let (gift, certificate) = store::redeem_gift_code(ctx, &settings, ledger, code, tx.clone())?;
    Ok((gift, tx, certificate))
}

async fn deactivate(code: &str, yes: bool, ctx: &Context) -> Result<()> {
    let mut ledger = store::load_ledger(ctx)?;
    let current = ledger.get(code)?;
    if current.state() != GiftCodeState::Unused {
        bail!("Gift code {} is {}, only unused codes can be deactivated", current.code, current.state());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Deactivate gift code '{}'?", current.code))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cancelled");
            return Ok(());
        }
    }

    let gift = ledger.deactivate(code)?.clone();
    store::save_ledger(ctx, ledger)?;

    if ctx.output.is_json() {
        ctx.output.json(&gift);
        return Ok(());
    }
    ctx.output.success(&format!("Deactivated {}", gift.code));
    Ok(())
}

async fn reactivate(code: &str, ctx: &Context) -> Result<()> {
    let mut ledger = store::load_ledger(ctx)?;
    let gift = ledger.reactivate(code)?.clone();
    store::save_ledger(ctx, ledger)?;

    if ctx.output.is_json() {
        ctx.output.json(&gift);
        return Ok(());
    }
    ctx.output.success(&format!("Reactivated {}", gift.code));
    Ok(())
}
