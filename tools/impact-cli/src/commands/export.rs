//! Registry export.

use std::fs;

use anyhow::{Context as _, Result};
use impact_commerce::billing::BillingPeriod;
use impact_commerce::export::registry_csv;
use impact_commerce::wallet::Certificate;

use super::ExportArgs;
use crate::context::Context;
use crate::store;

/// Run the export command.
pub async fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let period = args
        .period
        .as_deref()
        .map(BillingPeriod::parse)
        .transpose()?;

    let certificates = store::load_certificates(ctx)?;
    let selected: Vec<&Certificate> = certificates
        .iter()
        .filter(|c| period.map_or(true, |p| p.contains(c.certified_at)))
        .collect();

    let csv = registry_csv(selected.iter().copied());

    match args.out {
        Some(out) => {
            let path = ctx.cwd.join(out);
            fs::write(&path, &csv)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "path": path.display().to_string(),
                    "certificates": selected.len(),
                }));
            } else {
                ctx.output.success(&format!(
                    "Exported {} certificate(s) to {}",
                    selected.len(),
                    path.display()
                ));
            }
        }
        None => print!("{}", csv),
    }

    Ok(())
}
