//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use impact_commerce::catalog::{PaymentMode, SkuCatalog};
use impact_commerce::settings::{SettingKey, Settings};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, ImpactConfig, CONFIG_NAMES};
use crate::context::Context;
use crate::output::format_eur;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Set { key, value } => set_setting(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let settings = ctx.settings();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "path": ctx.config_path.as_ref().map(|p| p.display().to_string()),
            "settings": settings,
            "skus": ctx.config.skus,
            "files": ctx.config.files,
        }));
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.warn("No config file found, using defaults"),
    }

    // Settings section
    ctx.output.info("");
    ctx.output.info("[settings]");
    for (key, value) in settings.entries() {
        ctx.output.kv(key, &value);
    }

    // Files section
    ctx.output.info("");
    ctx.output.info("[files]");
    ctx.output
        .kv("gift_codes", &ctx.gift_codes_path().display().to_string());
    ctx.output
        .kv("transactions", &ctx.transactions_path().display().to_string());
    ctx.output
        .kv("certificates", &ctx.certificates_path().display().to_string());

    // SKUs
    if !ctx.config.skus.is_empty() {
        ctx.output.info("");
        ctx.output.info("[[skus]]");
        for sku in &ctx.config.skus {
            let mut line = format!("{} ({})", sku.code, sku.payment_mode.as_str());
            if sku.price > 0.0 {
                line.push_str(&format!(" {}", format_eur(sku.price)));
            }
            if sku.weight_grams > 0.0 {
                line.push_str(&format!(" {}g x {}", sku.weight_grams, sku.multiplier));
            }
            if !sku.active {
                line.push_str(" [inactive]");
            }
            ctx.output.list_item(&line);
        }
    }

    Ok(())
}

async fn set_setting(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = &ctx.config_path else {
        bail!("No config file found. Run `impact config init` to create one.");
    };

    // Validate against the current settings before touching the file
    let mut settings = ctx.settings();
    settings.set(key, value)?;
    let setting = SettingKey::from_str(key).context("Unknown setting")?;

    let mut config = ctx.config.clone();
    config
        .settings
        .retain(|k, _| SettingKey::from_str(k) != Some(setting));
    config.settings.insert(
        setting.as_str().to_string(),
        toml::Value::Float(settings.get(setting)),
    );
    config.save(&config_path.to_string_lossy())?;

    ctx.output
        .success(&format!("Set {} = {}", setting, settings.get(setting)));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect errors and warnings for a config.
fn check_config(config: &ImpactConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Settings: strict parse of every key
    let mut scratch = Settings::default();
    for (key, value) in config.setting_entries() {
        if let Err(e) = scratch.set(&key, &value) {
            errors.push(format!("settings: {}", e));
        }
    }
    for key in SettingKey::ALL {
        if !config.settings.keys().any(|k| SettingKey::from_str(k) == Some(key)) {
            warnings.push(format!(
                "settings.{} not set, using default {}",
                key,
                key.default_value()
            ));
        }
    }

    // SKUs
    if let Err(e) = SkuCatalog::from_skus(config.skus.iter().cloned()) {
        errors.push(format!("skus: {}", e));
    }
    for (i, sku) in config.skus.iter().enumerate() {
        let at = format!("skus[{}] {}", i, sku.code);
        if sku.code.trim().is_empty() {
            errors.push(format!("skus[{}].code is required", i));
        }
        if sku.price < 0.0 || sku.weight_grams < 0.0 || sku.multiplier < 0.0 {
            errors.push(format!("{}: price, weight and multiplier must not be negative", at));
        }
        match sku.payment_mode {
            PaymentMode::Unrecognized => {
                warnings.push(format!("{}: unknown payment mode, landings fall back to case F", at))
            }
            PaymentMode::Claim if sku.weight_grams <= 0.0 && sku.price <= 0.0 && !sku.is_admin() => {
                warnings.push(format!("{}: claim SKU has neither weight nor price", at))
            }
            PaymentMode::Claim if sku.merchant_id.is_none() && !sku.is_admin() => {
                warnings.push(format!("{}: claim SKU has no merchant to bill", at))
            }
            PaymentMode::Allocation if sku.partner_id.is_none() => {
                warnings.push(format!("{}: allocation SKU has no partner to bill", at))
            }
            PaymentMode::Pay | PaymentMode::GiftCard if sku.price <= 0.0 => {
                warnings.push(format!("{}: no price, amount must come from the URL", at))
            }
            _ => {}
        }
    }

    // Files
    for (name, path) in [
        ("gift_codes", &config.files.gift_codes),
        ("transactions", &config.files.transactions),
        ("certificates", &config.files.certificates),
    ] {
        if path.trim().is_empty() {
            errors.push(format!("files.{} must not be empty", name));
        }
    }

    (errors, warnings)
}
