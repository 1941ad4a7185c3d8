//! Gift code lifecycle.

use crate::ids::{BatchId, UserId};
use crate::ImpactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Flat status as stored and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftCodeState {
    Unused,
    Used,
    Deactivated,
}

impl GiftCodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCodeState::Unused => "UNUSED",
            GiftCodeState::Used => "USED",
            GiftCodeState::Deactivated => "DEACTIVATED",
        }
    }
}

impl fmt::Display for GiftCodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status with the redemption details a used code must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiftCodeStatus {
    Unused,
    Used { user_id: UserId, used_at: i64 },
    Deactivated,
}

impl GiftCodeStatus {
    pub fn state(&self) -> GiftCodeState {
        match self {
            GiftCodeStatus::Unused => GiftCodeState::Unused,
            GiftCodeStatus::Used { .. } => GiftCodeState::Used,
            GiftCodeStatus::Deactivated => GiftCodeState::Deactivated,
        }
    }
}

/// A single-use gift code bound to a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GiftCodeRecord", into = "GiftCodeRecord")]
pub struct GiftCode {
    pub code: String,
    pub sku_code: String,
    pub status: GiftCodeStatus,
    pub batch_id: Option<BatchId>,
    /// Unix timestamp.
    pub created_at: i64,
}

impl GiftCode {
    /// Create an unused code.
    pub fn new(code: impl Into<String>, sku_code: impl Into<String>, created_at: i64) -> Self {
        Self {
            code: code.into(),
            sku_code: sku_code.into(),
            status: GiftCodeStatus::Unused,
            batch_id: None,
            created_at,
        }
    }

    pub fn with_batch(mut self, batch_id: BatchId) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn state(&self) -> GiftCodeState {
        self.status.state()
    }

    pub fn is_redeemable(&self) -> bool {
        self.status == GiftCodeStatus::Unused
    }

    pub fn used_by(&self) -> Option<&UserId> {
        match &self.status {
            GiftCodeStatus::Used { user_id, .. } => Some(user_id),
            _ => None,
        }
    }

    pub fn used_at(&self) -> Option<i64> {
        match &self.status {
            GiftCodeStatus::Used { used_at, .. } => Some(*used_at),
            _ => None,
        }
    }

    /// Redeem for a customer: `UNUSED → USED`.
    pub fn redeem(&mut self, user_id: UserId, now: i64) -> Result<(), ImpactError> {
        match self.status {
            GiftCodeStatus::Unused => {
                info!(code = %self.code, user = %user_id, "gift code redeemed");
                self.status = GiftCodeStatus::Used {
                    user_id,
                    used_at: now,
                };
                Ok(())
            }
            GiftCodeStatus::Used { .. } => Err(ImpactError::GiftCodeAlreadyUsed(self.code.clone())),
            GiftCodeStatus::Deactivated => {
                Err(ImpactError::GiftCodeDeactivated(self.code.clone()))
            }
        }
    }

    /// Switch off an unused code: `UNUSED → DEACTIVATED`.
    pub fn deactivate(&mut self) -> Result<(), ImpactError> {
        self.transition(GiftCodeState::Unused, GiftCodeStatus::Deactivated)
    }

    /// Switch a deactivated code back on: `DEACTIVATED → UNUSED`.
    pub fn reactivate(&mut self) -> Result<(), ImpactError> {
        self.transition(GiftCodeState::Deactivated, GiftCodeStatus::Unused)
    }

    fn transition(&mut self, from: GiftCodeState, to: GiftCodeStatus) -> Result<(), ImpactError> {
        if self.state() != from {
            return Err(ImpactError::InvalidGiftCodeTransition {
                code: self.code.clone(),
                from: self.state().to_string(),
                to: to.state().to_string(),
            });
        }
        info!(code = %self.code, from = %from, to = %to.state(), "gift code status changed");
        self.status = to;
        Ok(())
    }
}

/// Stored shape: flat status plus optional redemption columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftCodeRecord {
    code: String,
    sku_code: String,
    status: GiftCodeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    used_by_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    used_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch_id: Option<BatchId>,
    #[serde(default)]
    created_at: i64,
}

impl TryFrom<GiftCodeRecord> for GiftCode {
    type Error = String;

    fn try_from(record: GiftCodeRecord) -> Result<Self, Self::Error> {
        let status = match (record.status, record.used_by_user_id, record.used_at) {
            (GiftCodeState::Used, Some(user_id), Some(used_at)) => {
                GiftCodeStatus::Used { user_id, used_at }
            }
            (GiftCodeState::Used, _, _) => {
                return Err(format!(
                    "gift code {} is USED but has no usedByUserId/usedAt",
                    record.code
                ))
            }
            (GiftCodeState::Unused, _, _) => GiftCodeStatus::Unused,
            (GiftCodeState::Deactivated, _, _) => GiftCodeStatus::Deactivated,
        };

        Ok(Self {
            code: record.code,
            sku_code: record.sku_code,
            status,
            batch_id: record.batch_id,
            created_at: record.created_at,
        })
    }
}

impl From<GiftCode> for GiftCodeRecord {
    fn from(code: GiftCode) -> Self {
        let status = code.state();
        let (used_by_user_id, used_at) = match code.status {
            GiftCodeStatus::Used { user_id, used_at } => (Some(user_id), Some(used_at)),
            _ => (None, None),
        };
        Self {
            code: code.code,
            sku_code: code.sku_code,
            status,
            used_by_user_id,
            used_at,
            batch_id: code.batch_id,
            created_at: code.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> GiftCode {
        GiftCode::new("GIFT-ABC123", "GIFT-10", 100)
    }

    #[test]
    fn test_redeem_sets_user_and_time() {
        let mut gift = code();
        gift.redeem(UserId::new("usr-1"), 200).unwrap();

        assert_eq!(gift.state(), GiftCodeState::Used);
        assert_eq!(gift.used_by(), Some(&UserId::new("usr-1")));
        assert_eq!(gift.used_at(), Some(200));
        assert!(!gift.is_redeemable());
    }

    #[test]
    fn test_redeem_twice_fails() {
        let mut gift = code();
        gift.redeem(UserId::new("usr-1"), 200).unwrap();
        let err = gift.redeem(UserId::new("usr-2"), 300).unwrap_err();

        assert_eq!(err, ImpactError::GiftCodeAlreadyUsed("GIFT-ABC123".to_string()));
        assert_eq!(gift.used_by(), Some(&UserId::new("usr-1")));
    }

    #[test]
    fn test_deactivate_and_reactivate() {
        let mut gift = code();
        gift.deactivate().unwrap();
        assert_eq!(gift.state(), GiftCodeState::Deactivated);

        let err = gift.redeem(UserId::new("usr-1"), 200).unwrap_err();
        assert_eq!(err, ImpactError::GiftCodeDeactivated("GIFT-ABC123".to_string()));

        gift.reactivate().unwrap();
        assert!(gift.is_redeemable());
    }

    #[test]
    fn test_used_code_cannot_change() {
        let mut gift = code();
        gift.redeem(UserId::new("usr-1"), 200).unwrap();

        assert!(matches!(
            gift.deactivate(),
            Err(ImpactError::InvalidGiftCodeTransition { .. })
        ));
        assert!(matches!(
            gift.reactivate(),
            Err(ImpactError::InvalidGiftCodeTransition { .. })
        ));
        assert_eq!(gift.state(), GiftCodeState::Used);
    }

    #[test]
    fn test_reactivate_unused_fails() {
        let err = code().reactivate().unwrap_err();
        assert_eq!(
            err,
            ImpactError::InvalidGiftCodeTransition {
                code: "GIFT-ABC123".to_string(),
                from: "UNUSED".to_string(),
                to: "UNUSED".to_string(),
            }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut gift = code();
        gift.redeem(UserId::new("usr-1"), 200).unwrap();

        let json = serde_json::to_value(&gift).unwrap();
        assert_eq!(json["status"], "USED");
        assert_eq!(json["usedByUserId"], "usr-1");
        assert_eq!(json["usedAt"], 200);
        assert_eq!(json["skuCode"], "GIFT-10");

        let back: GiftCode = serde_json::from_value(json).unwrap();
        assert_eq!(back, gift);
    }

    #[test]
    fn test_used_without_redemption_details_rejected() {
        let result: Result<GiftCode, _> = serde_json::from_str(
            r#"{"code": "X-123456", "skuCode": "GIFT-10", "status": "USED"}"#,
        );
        assert!(result.is_err());
    }
}
