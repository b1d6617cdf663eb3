use anyhow::Result;
use colored::Colorize;
use savvy_it::{config, init_tracing_with, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Configuration is loaded before tracing is initialized so that the
/// configured log level and format apply from the first line.
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    init_tracing_with(&cfg.server.log_level, &cfg.server.log_format);

    println!("{}", "Starting Savvy IT...".green());
    info!(config = %config_path.display(), "Configuration loaded");

    server::start_server(cfg, config_path.to_path_buf()).await
}
