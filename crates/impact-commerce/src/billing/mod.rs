//! Monthly billing of merchants and partners.
//!
//! Merchant-funded claims are billed to the SKU's merchant and allocations to
//! the partner that issued them. Each party with fees in a month gets one
//! statement, raised to the platform minimum when it falls short.

mod period;
mod statement;

pub use period::BillingPeriod;
pub use statement::{billing_party, generate_statements, BillingParty, MonthlyStatement};
