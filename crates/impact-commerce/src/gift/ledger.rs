//! Gift code ledger.

use crate::gift::{BatchUpload, GiftCode, GiftCodeState};
use crate::ids::UserId;
use crate::ImpactError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Outcome of importing a batch into the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub added: usize,
    /// Codes that already existed and were left untouched.
    pub duplicates: Vec<String>,
}

/// All known gift codes, indexed by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftCodeLedger {
    codes: BTreeMap<String, GiftCode>,
}

impl GiftCodeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored codes.
    pub fn from_codes(codes: impl IntoIterator<Item = GiftCode>) -> Result<Self, ImpactError> {
        let mut ledger = Self::new();
        for code in codes {
            ledger.insert(code)?;
        }
        Ok(ledger)
    }

    /// Add a single code.
    pub fn insert(&mut self, code: GiftCode) -> Result<(), ImpactError> {
        if self.codes.contains_key(&code.code) {
            return Err(ImpactError::DuplicateGiftCode(code.code));
        }
        self.codes.insert(code.code.clone(), code);
        Ok(())
    }

    /// Add every code of a parsed batch that is not already known.
    pub fn import(&mut self, upload: BatchUpload) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for code in upload.codes {
            if self.codes.contains_key(&code.code) {
                summary.duplicates.push(code.code);
            } else {
                self.codes.insert(code.code.clone(), code);
                summary.added += 1;
            }
        }

        if !summary.duplicates.is_empty() {
            warn!(
                batch = %upload.batch_id,
                count = summary.duplicates.len(),
                "batch contained codes already in the ledger"
            );
        }
        info!(batch = %upload.batch_id, added = summary.added, "imported gift code batch");
        summary
    }

    /// Look up a code. Lookup is case-insensitive.
    pub fn get(&self, code: &str) -> Result<&GiftCode, ImpactError> {
        let key = ledger_key(code);
        self.codes
            .get(&key)
            .ok_or(ImpactError::GiftCodeNotFound(key))
    }

    /// Redeem a code for a customer and return it.
    pub fn redeem(&mut self, code: &str, user_id: UserId, now: i64) -> Result<&GiftCode, ImpactError> {
        let gift = self.get_mut(code)?;
        gift.redeem(user_id, now)?;
        Ok(gift)
    }

    pub fn deactivate(&mut self, code: &str) -> Result<&GiftCode, ImpactError> {
        let gift = self.get_mut(code)?;
        gift.deactivate()?;
        Ok(gift)
    }

    pub fn reactivate(&mut self, code: &str) -> Result<&GiftCode, ImpactError> {
        let gift = self.get_mut(code)?;
        gift.reactivate()?;
        Ok(gift)
    }

    fn get_mut(&mut self, code: &str) -> Result<&mut GiftCode, ImpactError> {
        let key = ledger_key(code);
        self.codes
            .get_mut(&key)
            .ok_or(ImpactError::GiftCodeNotFound(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GiftCode> {
        self.codes.values()
    }

    pub fn count_by_state(&self, state: GiftCodeState) -> usize {
        self.codes.values().filter(|c| c.state() == state).count()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in storage order.
    pub fn into_codes(self) -> Vec<GiftCode> {
        self.codes.into_values().collect()
    }
}

fn ledger_key(code: &str) -> String {
    code.trim().to_uppercase()
}
