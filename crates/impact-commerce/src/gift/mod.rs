//! Gift codes.
//!
//! Codes are uploaded in batches, redeemed once by a customer, and can be
//! switched off and on again by an admin while still unused.

mod batch;
mod code;
mod ledger;

pub use batch::{
    generate_codes, normalize_code, parse_batch, BatchRejection, BatchUpload, CODE_ALPHABET,
};
pub use code::{GiftCode, GiftCodeState, GiftCodeStatus};
pub use ledger::{GiftCodeLedger, ImportSummary};
