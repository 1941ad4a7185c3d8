//! Customer wallet.

use anyhow::Result;
use impact_commerce::ids::UserId;
use impact_commerce::impact::format_impact_grams;

use super::WalletArgs;
use crate::context::Context;
use crate::output::{format_eur, format_timestamp};
use crate::store;

/// Run the wallet command.
pub async fn run(args: WalletArgs, ctx: &Context) -> Result<()> {
    let settings = ctx.settings();
    let transactions = store::load_transactions(ctx)?;
    let certificates = store::load_certificates(ctx)?;

    let user_id = UserId::new(args.user);
    let wallet = store::current_wallet(&user_id, &transactions, &certificates, &settings)?;

    if ctx.output.is_json() {
        ctx.output.json(&wallet);
        return Ok(());
    }

    let progress = wallet.progress(&settings);

    ctx.output.header(&format!("Wallet for {}", wallet.user_id));
    ctx.output.kv("Balance", &format_eur(wallet.balance));
    ctx.output.kv(
        "Pending impact",
        &format_impact_grams(wallet.pending_impact_kg * 1000.0),
    );
    ctx.output.kv(
        "Certification",
        &format!(
            "{:.0}% of {}",
            progress.threshold_progress,
            format_eur(settings.certification_threshold())
        ),
    );
    ctx.output.kv("Lifetime", &format_eur(wallet.lifetime_amount));
    ctx.output.kv(
        "Lifetime impact",
        &format_impact_grams(wallet.lifetime_impact_kg * 1000.0),
    );

    if wallet.certificates.is_empty() {
        ctx.output.info("");
        ctx.output.info("No certificates yet.");
        return Ok(());
    }

    ctx.output.info("");
    ctx.output
        .table_row(&["CERTIFICATE", "ISSUED", "AMOUNT", "IMPACT"], &[28, 22, 10, 12]);
    for certificate in &wallet.certificates {
        ctx.output.table_row(
            &[
                certificate.id.as_str(),
                &format_timestamp(certificate.certified_at),
                &format_eur(certificate.amount),
                &format!("{:.2} kg", certificate.impact_kg),
            ],
            &[28, 22, 10, 12],
        );
    }
    ctx.output.info(&format!(
        "Certified: {:.2} kg",
        wallet.certified_impact_kg()
    ));

    Ok(())
}
