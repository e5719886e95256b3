//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
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
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());

    ctx.output.info("[cart]");
    ctx.output.kv("slot_key", &config.cart.slot_key);
    ctx.output.kv("default_size", &config.cart.default_size);
    ctx.output.kv("currency", config.cart.currency.code());

    ctx.output.info("[checkout]");
    ctx.output.kv(
        "flat_shipping_cents",
        &config.checkout.flat_shipping_cents.to_string(),
    );
    ctx.output.kv(
        "free_shipping_threshold_cents",
        &config.checkout.free_shipping_threshold_cents.to_string(),
    );
    ctx.output.kv(
        "tax_rate_percent",
        &config.checkout.tax_rate_percent.to_string(),
    );

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("telly.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "created": config_path }));
    } else {
        ctx.output.success(&format!("Created: {}", config_path.display()));
    }

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let problems = ctx.config.problems();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": problems.is_empty(),
            "problems": problems,
        }));
    } else {
        ctx.output.header("Validating configuration");
        for problem in &problems {
            ctx.output.error(&format!("Error: {}", problem));
        }
    }

    if !problems.is_empty() {
        bail!("Configuration has {} error(s)", problems.len());
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}
