//! SKU catalog module.
//!
//! Contains the SKU definition and the in-memory catalog used to resolve
//! landing-page `sku` parameters.

mod index;
mod sku;

pub use index::SkuCatalog;
pub use sku::{PaymentMode, Sku, ADMIN_SKU_PREFIX};
