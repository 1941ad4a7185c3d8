//! JSON data files next to the config.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use impact_commerce::gift::{GiftCode, GiftCodeLedger};
use impact_commerce::ids::{TransactionId, UserId};
use impact_commerce::settings::Settings;
use impact_commerce::wallet::{Certificate, Transaction, Wallet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::context::Context;

/// Read a JSON file, treating a missing file as empty.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "data file missing, starting empty");
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a JSON file, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn load_ledger(ctx: &Context) -> Result<GiftCodeLedger> {
    let codes: Vec<GiftCode> = load_json(&ctx.gift_codes_path())?;
    GiftCodeLedger::from_codes(codes).context("Gift code ledger is inconsistent")
}

pub fn save_ledger(ctx: &Context, ledger: GiftCodeLedger) -> Result<()> {
    save_json(&ctx.gift_codes_path(), &ledger.into_codes())
}

pub fn load_transactions(ctx: &Context) -> Result<Vec<Transaction>> {
    load_json(&ctx.transactions_path())
}

pub fn load_certificates(ctx: &Context) -> Result<Vec<Certificate>> {
    load_json(&ctx.certificates_path())
}

/// Append a transaction and issue a certificate if the user's wallet
/// reaches the threshold.
pub fn record_transaction(
    ctx: &Context,
    settings: &Settings,
    tx: Transaction,
) -> Result<Option<Certificate>> {
    let mut transactions = load_transactions(ctx)?;
    let mut certificates = load_certificates(ctx)?;

    let mut wallet = current_wallet(&tx.user_id, &transactions, &certificates, settings)?;
    let on_file = certificates
        .iter()
        .filter(|c| c.user_id == tx.user_id)
        .count();
    let issued = wallet.accrue(&tx, settings)?;

    transactions.push(tx);
    save_json(&ctx.transactions_path(), &transactions)?;

    if wallet.certificates.len() > on_file {
        certificates.extend(wallet.certificates.drain(on_file..));
        save_json(&ctx.certificates_path(), &certificates)?;
    }

    Ok(issued)
}

/// Redeem a gift code and credit `tx` to the redeeming user.
///
/// The ledger is written only after the transaction is on file, so a failed
/// record leaves the code unused.
pub fn redeem_gift_code(
    ctx: &Context,
    settings: &Settings,
    mut ledger: GiftCodeLedger,
    code: &str,
    tx: Transaction,
) -> Result<(GiftCode, Option<Certificate>)> {
    let gift = ledger.redeem(code, tx.user_id.clone(), tx.created_at)?.clone();
    let certificate = record_transaction(ctx, settings, tx)?;
    save_ledger(ctx, ledger)?;
    Ok((gift, certificate))
}

/// Wallet state for a user.
///
/// Certificates on file are final. Only the transactions they do not cover
/// are replayed, so certificate ids stay stable across runs.
pub fn current_wallet(
    user_id: &UserId,
    transactions: &[Transaction],
    certificates: &[Certificate],
    settings: &Settings,
) -> Result<Wallet> {
    let issued: Vec<Certificate> = certificates
        .iter()
        .filter(|c| &c.user_id == user_id)
        .cloned()
        .collect();
    let mut wallet = {
        let certified: HashSet<&TransactionId> = issued
            .iter()
            .flat_map(|c| c.transaction_ids.iter())
            .collect();
        let pending = transactions.iter().filter(|tx| !certified.contains(&tx.id));
        Wallet::replay(user_id.clone(), pending, settings)?
    };

    wallet.lifetime_amount += issued.iter().map(|c| c.amount).sum::<f64>();
    wallet.lifetime_impact_kg += issued.iter().map(|c| c.impact_kg).sum::<f64>();

    let mut history = issued;
    history.append(&mut wallet.certificates);
    wallet.certificates = history;

    Ok(wallet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use impact_commerce::gift::GiftCodeState;
    use impact_commerce::ids::CertificateId;
    use impact_commerce::wallet::AcquisitionFlow;

    fn seed_ledger(ctx: &Context, codes: &[&str]) {
        let ledger =
            GiftCodeLedger::from_codes(codes.iter().map(|c| GiftCode::new(*c, "GIFT-10", 1)))
                .unwrap();
        save_ledger(ctx, ledger).unwrap();
    }

    fn tx(user: &str, amount: f64, at: i64) -> Transaction {
        Transaction::new(
            UserId::new(user),
            AcquisitionFlow::DirectPayment,
            amount,
            amount / 0.11,
            at,
        )
    }

    #[test]
    fn test_failed_record_keeps_code_unused() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::for_dir(dir.path());
        seed_ledger(&ctx, &["GIFT-AAAAAA"]);
        fs::create_dir_all(ctx.transactions_path().parent().unwrap()).unwrap();
        fs::write(ctx.transactions_path(), "{ not json").unwrap();

        let ledger = load_ledger(&ctx).unwrap();
        let tx = tx("usr-1", 10.0, 5);
        let result = redeem_gift_code(&ctx, &Settings::default(), ledger, "GIFT-AAAAAA", tx);
        assert!(result.is_err());

        let ledger = load_ledger(&ctx).unwrap();
        assert!(ledger.get("GIFT-AAAAAA").unwrap().is_redeemable());
    }

    #[test]
    fn test_redeem_gift_code_saves_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::for_dir(dir.path());
        seed_ledger(&ctx, &["GIFT-AAAAAA"]);

        let ledger = load_ledger(&ctx).unwrap();
        let (gift, certificate) =
            redeem_gift_code(&ctx, &Settings::default(), ledger, "gift-aaaaaa", tx("usr-1", 10.0, 5))
                .unwrap();

        assert_eq!(gift.used_by(), Some(&UserId::new("usr-1")));
        assert!(certificate.is_some());
        assert_eq!(load_transactions(&ctx).unwrap().len(), 1);
        assert_eq!(load_certificates(&ctx).unwrap().len(), 1);
        assert_eq!(
            load_ledger(&ctx).unwrap().get("GIFT-AAAAAA").unwrap().state(),
            GiftCodeState::Used
        );
    }

    #[test]
    fn test_current_wallet_keeps_issued_certificates() {
        let history = vec![tx("usr-1", 6.0, 1), tx("usr-1", 5.0, 2), tx("usr-1", 1.0, 3)];
        let on_file = vec![Certificate {
            id: CertificateId::new("crt-1"),
            user_id: UserId::new("usr-1"),
            amount: 11.0,
            impact_kg: 100.0,
            transaction_ids: vec![history[0].id.clone(), history[1].id.clone()],
            certified_at: 2,
        }];

        let wallet =
            current_wallet(&UserId::new("usr-1"), &history, &on_file, &Settings::default())
                .unwrap();

        assert_eq!(wallet.balance, 1.0);
        assert_eq!(wallet.certificates.len(), 1);
        assert_eq!(wallet.certificates[0].id, CertificateId::new("crt-1"));
        assert_eq!(wallet.lifetime_amount, 12.0);
    }

    #[test]
    fn test_current_wallet_ignores_other_users() {
        let history = vec![tx("usr-2", 50.0, 1)];
        let wallet =
            current_wallet(&UserId::new("usr-1"), &history, &[], &Settings::default()).unwrap();
        assert_eq!(wallet.balance, 0.0);
        assert!(wallet.certificates.is_empty());
    }
}
