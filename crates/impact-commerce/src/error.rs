//! Impact domain error types.

use thiserror::Error;

/// Errors that can occur in impact commerce operations.
///
/// Landing classification and impact calculation never produce these; they
/// degrade to defaults instead. Only the stateful operations (catalog edits,
/// gift code transitions, settings writes, wallet accrual) are fallible.
#[derive(Error, Debug, PartialEq)]
pub enum ImpactError {
    /// SKU not found.
    #[error("SKU not found: {0}")]
    SkuNotFound(String),

    /// SKU code already present in the catalog.
    #[error("Duplicate SKU code: {0}")]
    DuplicateSku(String),

    /// Gift code not found.
    #[error("Gift code not found: {0}")]
    GiftCodeNotFound(String),

    /// Gift code already present in the ledger.
    #[error("Duplicate gift code: {0}")]
    DuplicateGiftCode(String),

    /// Gift code has already been redeemed.
    #[error("Gift code already used: {0}")]
    GiftCodeAlreadyUsed(String),

    /// Gift code was deactivated by an administrator.
    #[error("Gift code deactivated: {0}")]
    GiftCodeDeactivated(String),

    /// Gift code status transition not allowed.
    #[error("Invalid gift code transition for {code} from {from} to {to}")]
    InvalidGiftCodeTransition {
        code: String,
        from: String,
        to: String,
    },

    /// Gift code is malformed.
    #[error("Invalid gift code {code:?}: {reason}")]
    InvalidGiftCode { code: String, reason: String },

    /// Setting key is unknown or its value is out of range.
    #[error("Invalid setting {key}={value}: {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    /// Transaction does not belong to the wallet it was applied to.
    #[error("Transaction {transaction} belongs to {owner}, not wallet {wallet}")]
    WalletMismatch {
        transaction: String,
        owner: String,
        wallet: String,
    },

    /// Amount was negative or not a number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Billing period could not be parsed.
    #[error("Invalid billing period: {0}")]
    InvalidPeriod(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// A money sum does not fit in cents.
    #[error("Amount overflow")]
    AmountOverflow,
}
