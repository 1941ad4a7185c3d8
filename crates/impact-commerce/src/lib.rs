//! Domain types and logic for plastic-offset commerce.
//!
//! Customers reach a landing page from a QR code or link. The URL names a
//! SKU and optional overrides; this crate decides what the page shows and
//! what the customer ends up with:
//!
//! - **Catalog**: SKUs and their payment modes
//! - **Landing**: Case routing (A-F, ADMIN), form type, amount and message
//! - **Impact**: EUR and weight to kilograms of recovered plastic
//! - **Wallet**: Transactions, balances and certification
//! - **Gift**: Gift code batches and lifecycle
//! - **Billing**: Monthly merchant and partner statements
//! - **Export**: Registry CSV of issued certificates
//!
//! # Example
//!
//! ```rust,ignore
//! use impact_commerce::prelude::*;
//!
//! let catalog = SkuCatalog::from_skus([
//!     Sku::new("BOTTLE-500", PaymentMode::Claim)
//!         .with_weight(2500.0, 2.0)
//!         .with_merchant("acme"),
//! ])?;
//!
//! let params = LandingParams::from_query("sku=BOTTLE-500&name=Ana");
//! let landing = resolve_landing(&catalog, &Settings::default(), params);
//!
//! assert_eq!(landing.case, LandingCase::A);
//! println!("{}", landing.impact.display_value); // 5.00 kg
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod settings;

pub mod billing;
pub mod catalog;
pub mod export;
pub mod gift;
pub mod impact;
pub mod landing;
pub mod wallet;

pub use error::ImpactError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::ImpactError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::settings::{SettingKey, Settings};

    // Catalog
    pub use crate::catalog::{PaymentMode, Sku, SkuCatalog};

    // Landing
    pub use crate::landing::{
        resolve_landing, FormType, LandingCase, LandingMessage, LandingParams, LandingResolution,
    };

    // Impact
    pub use crate::impact::{calculate_impact, calculate_weight_based_impact, ImpactCalculation};

    // Wallet
    pub use crate::wallet::{AcquisitionFlow, Certificate, Transaction, Wallet};

    // Gift codes
    pub use crate::gift::{GiftCode, GiftCodeLedger, GiftCodeState};

    // Billing
    pub use crate::billing::{generate_statements, BillingParty, BillingPeriod, MonthlyStatement};
}
