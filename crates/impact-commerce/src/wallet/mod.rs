//! Customer wallets.
//!
//! Every acquisition flow ends in a [`Transaction`] credited to a wallet.
//! Once the wallet balance reaches the certification threshold it is
//! converted into a [`Certificate`].

mod account;
mod certificate;
mod transaction;

pub use account::Wallet;
pub use certificate::Certificate;
pub use transaction::{AcquisitionFlow, Transaction};
