//! Certified impact assets.

use crate::ids::{CertificateId, TransactionId, UserId};
use serde::{Deserialize, Serialize};

/// A wallet balance converted into an auditable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: CertificateId,
    pub user_id: UserId,
    /// Certified amount in EUR.
    pub amount: f64,
    pub impact_kg: f64,
    /// Transactions that make up the certified balance.
    pub transaction_ids: Vec<TransactionId>,
    /// Unix timestamp.
    pub certified_at: i64,
}
