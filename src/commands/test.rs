use anyhow::Result;
use colored::Colorize;
use savvy_it::{config, logging::mask_secret, pricing::ServiceCategory};
use std::path::Path;
use tracing::info;

/// Execute the test command
///
/// Validates the configuration file without starting the server
pub fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!(config = %config_path.display(), "Loading and validating configuration");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    match &cfg.server.static_dir {
        Some(dir) => println!("  {}: {}", "Static Site".cyan(), dir.display()),
        None => println!("  {}: {}", "Static Site".cyan(), "not served".dimmed()),
    }
    println!();

    let engine = cfg.estimator.engine();
    println!("{}", "Estimator:".cyan());
    println!("    Range policy: {:?}", engine.policy());
    println!("    Display delay: {}ms", cfg.estimator.display_delay_ms);
    for category in ServiceCategory::ALL {
        println!(
            "    {} → ${}",
            category.label(),
            engine.rate_card().base_rate(category)
        );
    }
    println!();

    println!("{}", "Chat Assistant:".cyan());
    if cfg.chat.enabled {
        println!("    Status: {}", "enabled".green());
        println!("    Model: {}", cfg.chat.model);
        println!("    API Key: {}", mask_secret(&cfg.chat.api_key));
    } else {
        println!("    Status: {}", "disabled".red());
    }
    println!();

    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            format!("enabled at {}", cfg.metrics.endpoint).green()
        } else {
            "disabled".red()
        }
    );

    info!("Configuration test completed successfully");
    Ok(())
}
