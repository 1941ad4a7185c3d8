//! Wallet balance and certification.

use crate::ids::{CertificateId, TransactionId, UserId};
use crate::impact::{calculate_impact, ImpactCalculation};
use crate::settings::Settings;
use crate::wallet::{Certificate, Transaction};
use crate::ImpactError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A customer's accrued impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub user_id: UserId,
    /// Uncertified balance in EUR.
    pub balance: f64,
    /// Impact behind the uncertified balance.
    pub pending_impact_kg: f64,
    /// Transactions behind the uncertified balance.
    pub pending_transactions: Vec<TransactionId>,
    /// Everything ever credited, certified or not.
    pub lifetime_amount: f64,
    pub lifetime_impact_kg: f64,
    pub certificates: Vec<Certificate>,
}

impl Wallet {
    /// Create an empty wallet.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0.0,
            pending_impact_kg: 0.0,
            pending_transactions: Vec::new(),
            lifetime_amount: 0.0,
            lifetime_impact_kg: 0.0,
            certificates: Vec::new(),
        }
    }

    /// Rebuild a wallet from a transaction history, oldest first.
    ///
    /// Transactions for other users are skipped.
    pub fn replay<'a>(
        user_id: UserId,
        transactions: impl IntoIterator<Item = &'a Transaction>,
        settings: &Settings,
    ) -> Result<Self, ImpactError> {
        let mut own: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|tx| tx.user_id == user_id)
            .collect();
        own.sort_by_key(|tx| tx.created_at);

        let mut wallet = Self::new(user_id);
        for tx in own {
            wallet.accrue(tx, settings)?;
        }
        Ok(wallet)
    }

    /// Credit a transaction.
    ///
    /// Returns the certificate issued when the balance reaches the
    /// certification threshold. The whole balance is certified and the
    /// wallet starts again from zero.
    pub fn accrue(
        &mut self,
        tx: &Transaction,
        settings: &Settings,
    ) -> Result<Option<Certificate>, ImpactError> {
        if tx.user_id != self.user_id {
            return Err(ImpactError::WalletMismatch {
                transaction: tx.id.to_string(),
                owner: tx.user_id.to_string(),
                wallet: self.user_id.to_string(),
            });
        }
        if !tx.amount.is_finite() || tx.amount < 0.0 {
            return Err(ImpactError::InvalidAmount(tx.amount));
        }

        let impact_kg = if tx.impact_kg.is_finite() && tx.impact_kg >= 0.0 {
            tx.impact_kg
        } else {
            calculate_impact(tx.amount, settings.price_per_kg(), 0.0).impact_kg
        };

        self.balance += tx.amount;
        self.pending_impact_kg += impact_kg;
        self.pending_transactions.push(tx.id.clone());
        self.lifetime_amount += tx.amount;
        self.lifetime_impact_kg += impact_kg;

        if self.balance < settings.certification_threshold() {
            return Ok(None);
        }

        let certificate = Certificate {
            id: CertificateId::generate(),
            user_id: self.user_id.clone(),
            amount: self.balance,
            impact_kg: self.pending_impact_kg,
            transaction_ids: std::mem::take(&mut self.pending_transactions),
            certified_at: tx.created_at,
        };
        self.balance = 0.0;
        self.pending_impact_kg = 0.0;

        info!(
            user = %self.user_id,
            certificate = %certificate.id,
            amount = certificate.amount,
            impact_kg = certificate.impact_kg,
            "wallet balance certified"
        );

        self.certificates.push(certificate.clone());
        Ok(Some(certificate))
    }

    /// Progress of the uncertified balance towards the threshold.
    pub fn progress(&self, settings: &Settings) -> ImpactCalculation {
        calculate_impact(
            self.balance,
            settings.price_per_kg(),
            settings.certification_threshold(),
        )
    }

    pub fn certified_impact_kg(&self) -> f64 {
        self.certificates.iter().map(|c| c.impact_kg).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::AcquisitionFlow;

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
    fn test_accrue_below_threshold() {
        let settings = Settings::default();
        let mut wallet = Wallet::new(UserId::new("usr-1"));

        assert_eq!(wallet.accrue(&tx("usr-1", 4.0, 1), &settings).unwrap(), None);
        assert_eq!(wallet.balance, 4.0);
        assert_eq!(wallet.pending_transactions.len(), 1);

        let progress = wallet.progress(&settings);
        assert!(progress.below_threshold);
        assert!((progress.threshold_progress - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossing_threshold_certifies_whole_balance() {
        let settings = Settings::default();
        let mut wallet = Wallet::new(UserId::new("usr-1"));

        wallet.accrue(&tx("usr-1", 6.0, 1), &settings).unwrap();
        let certificate = wallet
            .accrue(&tx("usr-1", 5.0, 2), &settings)
            .unwrap()
            .expect("threshold crossed");

        assert_eq!(certificate.amount, 11.0);
        assert!((certificate.impact_kg - 100.0).abs() < 1e-9);
        assert_eq!(certificate.transaction_ids.len(), 2);
        assert_eq!(certificate.certified_at, 2);

        assert_eq!(wallet.balance, 0.0);
        assert!(wallet.pending_transactions.is_empty());
        assert_eq!(wallet.lifetime_amount, 11.0);
        assert_eq!(wallet.certificates.len(), 1);
    }

    #[test]
    fn test_exact_threshold_certifies() {
        let settings = Settings::default();
        let mut wallet = Wallet::new(UserId::new("usr-1"));
        assert!(wallet.accrue(&tx("usr-1", 10.0, 1), &settings).unwrap().is_some());
    }

    #[test]
    fn test_rejects_foreign_transaction() {
        let mut wallet = Wallet::new(UserId::new("usr-1"));
        let err = wallet
            .accrue(&tx("usr-2", 1.0, 1), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, ImpactError::WalletMismatch { .. }));
        assert_eq!(wallet.balance, 0.0);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let mut wallet = Wallet::new(UserId::new("usr-1"));
        let err = wallet
            .accrue(&tx("usr-1", -1.0, 1), &Settings::default())
            .unwrap_err();
        assert_eq!(err, ImpactError::InvalidAmount(-1.0));
    }

    #[test]
    fn test_replay_orders_and_filters() {
        let history = vec![
            tx("usr-1", 3.0, 30),
            tx("usr-2", 50.0, 10),
            tx("usr-1", 8.0, 20),
            tx("usr-1", 1.0, 40),
        ];
        let wallet =
            Wallet::replay(UserId::new("usr-1"), &history, &Settings::default()).unwrap();

        assert_eq!(wallet.certificates.len(), 1);
        assert_eq!(wallet.certificates[0].certified_at, 30);
        assert_eq!(wallet.certificates[0].amount, 11.0);
        assert_eq!(wallet.balance, 1.0);
        assert_eq!(wallet.lifetime_amount, 12.0);
    }
}
