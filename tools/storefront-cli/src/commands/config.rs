//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, StorefrontConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output.kv("log_level", &ctx.config.log_level);

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.config.storage.dir);
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);
    if ctx.profile.is_some() {
        ctx.output.kv("active key", &ctx.cart_key());
    }

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(sample catalog)"),
    );
    ctx.output.kv("currency", &ctx.config.catalog.currency);

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv("tax_rate_bps", &ctx.config.checkout.tax_rate_bps.to_string());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = ctx.config_path.clone() else {
        bail!("No config file found. Run `storefront config init` to create one.");
    };

    let mut config = StorefrontConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("storefront.toml");

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

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let errors = ctx.config.validate();
    if errors.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    bail!("Configuration has {} error(s)", errors.len());
}

fn get_config_value(config: &StorefrontConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["log_level"] => Ok(config.log_level.clone()),
        ["storage", "dir"] => Ok(config.storage.dir.clone()),
        ["storage", "cart_key"] => Ok(config.storage.cart_key.clone()),
        ["catalog", "path"] => Ok(config.catalog.path.clone().unwrap_or_default()),
        ["catalog", "currency"] => Ok(config.catalog.currency.clone()),
        ["checkout", "tax_rate_bps"] => Ok(config.checkout.tax_rate_bps.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut StorefrontConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["log_level"] => config.log_level = value.to_string(),
        ["storage", "dir"] => config.storage.dir = value.to_string(),
        ["storage", "cart_key"] => config.storage.cart_key = value.to_string(),
        ["catalog", "path"] if value.is_empty() => config.catalog.path = None,
        ["catalog", "path"] => config.catalog.path = Some(value.to_string()),
        ["catalog", "currency"] => config.catalog.currency = value.to_uppercase(),
        ["checkout", "tax_rate_bps"] => config.checkout.tax_rate_bps = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    let errors = config.validate();
    if let Some(error) = errors.first() {
        bail!("Invalid value for {}: {}", key, error);
    }
    Ok(())
}
