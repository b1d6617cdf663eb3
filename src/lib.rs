pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod estimator;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pricing;
pub mod providers;
pub mod server;
pub mod signals;
pub mod static_files;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging with the `info` level and text output
///
/// Note: This function can only be called once. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    init_tracing_with("info", "text");
}

/// Initialize tracing/logging with a default level and "text" or "json" output
pub fn init_tracing_with(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
