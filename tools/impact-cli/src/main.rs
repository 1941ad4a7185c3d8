//! Impact CLI - Back-office tool for plastic-offset landing pages.
//!
//! Commands:
//! - `impact landing` - Resolve a landing URL
//! - `impact calc` - Convert an amount or weight into impact
//! - `impact gift` - Manage gift codes
//! - `impact wallet` - Show a customer's wallet
//! - `impact billing` - Monthly merchant and partner statements
//! - `impact export` - Export certificates for the registry
//! - `impact config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    BillingArgs, CalcArgs, ConfigArgs, ExportArgs, GiftArgs, LandingArgs, WalletArgs,
};

/// Impact CLI - Resolve landing pages and manage impact records
#[derive(Parser)]
#[command(name = "impact")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a landing URL into case, form, amount and message
    Landing(LandingArgs),

    /// Convert an amount or a product weight into impact
    Calc(CalcArgs),

    /// Manage gift codes
    Gift(GiftArgs),

    /// Show a customer's wallet and certificates
    Wallet(WalletArgs),

    /// Generate monthly billing statements
    Billing(BillingArgs),

    /// Export certificates as registry CSV
    Export(ExportArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Landing(args) => commands::landing::run(args, &ctx).await,
        Commands::Calc(args) => commands::calc::run(args, &ctx).await,
        Commands::Gift(args) => commands::gift::run(args, &ctx).await,
        Commands::Wallet(args) => commands::wallet::run(args, &ctx).await,
        Commands::Billing(args) => commands::billing::run(args, &ctx).await,
        Commands::Export(args) => commands::export::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
