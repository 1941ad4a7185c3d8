//! CLI command implementations.

pub mod billing;
pub mod calc;
pub mod config;
pub mod export;
pub mod gift;
pub mod landing;
pub mod wallet;

use clap::{Args, Subcommand};

/// Arguments for the landing command.
#[derive(Args)]
pub struct LandingArgs {
    /// Landing URL or query string (e.g. "sku=BOTTLE-500&name=Ana").
    pub url: String,

    /// Record the outcome as a transaction for this user.
    #[arg(long)]
    pub record: Option<String>,
}

/// Arguments for the calc command.
#[derive(Args)]
pub struct CalcArgs {
    /// Amount in EUR.
    #[arg(short, long, conflicts_with = "weight")]
    pub amount: Option<f64>,

    /// Product weight in grams.
    #[arg(short, long)]
    pub weight: Option<f64>,

    /// Impact multiplier for weight-based claims.
    #[arg(short, long, requires = "weight")]
    pub multiplier: Option<f64>,

    /// Override the price per kg from the config.
    #[arg(long)]
    pub price_per_kg: Option<f64>,
}

/// Arguments for the gift command.
#[derive(Args)]
pub struct GiftArgs {
    #[command(subcommand)]
    pub command: GiftCommand,
}

#[derive(Subcommand)]
pub enum GiftCommand {
    /// Import a batch of codes from a file (one per line, optional ",SKU").
    Import {
        /// Batch file path.
        file: String,
        /// SKU for lines without one.
        #[arg(short, long)]
        sku: Option<String>,
        /// Batch identifier (generated if omitted).
        #[arg(short, long)]
        batch: Option<String>,
    },
    /// Generate random codes and add them to the ledger.
    Generate {
        /// SKU the codes redeem.
        #[arg(short, long)]
        sku: String,
        /// Number of codes.
        #[arg(short, long, default_value_t = 10)]
        count: usize,
        /// Code prefix.
        #[arg(short, long, default_value = "")]
        prefix: String,
        /// Also write the codes to this file.
        #[arg(short, long)]
        out: Option<String>,
    },
    /// List codes.
    List {
        /// Only show codes with this status (unused, used, deactivated).
        #[arg(long)]
        status: Option<String>,
        /// Show only the first N codes.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Redeem a code for a customer.
    Redeem {
        /// Gift code.
        code: String,
        /// Customer receiving the impact.
        #[arg(short, long)]
        user: String,
    },
    /// Deactivate an unused code.
    Deactivate {
        /// Gift code.
        code: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Reactivate a deactivated code.
    Reactivate {
        /// Gift code.
        code: String,
    },
}

/// Arguments for the wallet command.
#[derive(Args)]
pub struct WalletArgs {
    /// Customer id.
    pub user: String,
}

/// Arguments for the billing command.
#[derive(Args)]
pub struct BillingArgs {
    /// Billing month as YYYY-MM (default: previous month).
    #[arg(short, long)]
    pub period: Option<String>,
}

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: stdout).
    #[arg(short, long)]
    pub out: Option<String>,

    /// Only export certificates issued in this month (YYYY-MM).
    #[arg(short, long)]
    pub period: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Set a platform setting (e.g. PRICE_PER_KG 0.12).
    Set {
        /// Setting key.
        key: String,
        /// New value.
        value: String,
    },
    /// Create a default config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
