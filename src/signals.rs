use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::{load_config, Config};

/// Setup signal handlers for the server
///
/// The returned sender fires once when the server should drain and stop.
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Reload configuration from `config_path`
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<ArcSwap<Config>>,
    config_path: PathBuf,
) -> Result<(broadcast::Sender<()>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(());
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(());
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading configuration");
                    match reload_config(&config, &config_path) {
                        Ok(()) => info!("Configuration reloaded successfully"),
                        Err(e) => error!("Failed to reload configuration: {}", e),
                    }
                }
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Ctrl+C only
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<ArcSwap<Config>>,
    _config_path: PathBuf,
) -> Result<(broadcast::Sender<()>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Load, validate and swap in a new configuration
///
/// On failure the running configuration stays in place. Host, port and
/// static_dir only take effect on restart.
pub fn reload_config(config: &ArcSwap<Config>, config_path: &std::path::Path) -> Result<()> {
    let new_config = load_config(config_path)?;
    let current = config.load();

    if new_config.server.host != current.server.host
        || new_config.server.port != current.server.port
    {
        info!("Listen address changes take effect on restart");
    }

    info!(
        chat_enabled = new_config.chat.enabled,
        model = %new_config.chat.model,
        range_policy = ?new_config.estimator.range_policy,
        "New configuration loaded"
    );

    config.store(Arc::new(new_config));
    Ok(())
}
