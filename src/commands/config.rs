use anyhow::Result;
use colored::Colorize;
use savvy_it::{
    config::{self, Config},
    logging::mask_secret,
};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&sanitized)?);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Base rate overrides: {}", cfg.estimator.base_rates.len());
    println!("  Range policy: {:?}", cfg.estimator.range_policy);
    println!("  Chat: {}", if cfg.chat.enabled { "enabled" } else { "disabled" });

    info!("Configuration validation successful");
    Ok(())
}

fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.chat.api_key = mask_secret(&cfg.chat.api_key);
    sanitized
}
