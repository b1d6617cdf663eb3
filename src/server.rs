use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    handlers::{self, AppState},
    logging::mask_secret,
    metrics,
    signals::setup_signal_handlers,
    static_files,
};

/// Request bodies are small JSON documents; chat messages cap at a few KB
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Start the Savvy IT server
///
/// 1. Initializes metrics (when enabled)
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Builds the router and binds the configured address
/// 4. Serves until SIGTERM/SIGINT
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path)?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState::new(config_swap, reqwest::Client::new());
    let app = create_router(state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting Savvy IT on {}", addr);
    info!(
        chat_enabled = config.chat.enabled,
        chat_model = %config.chat.model,
        chat_api_key = %mask_secret(&config.chat.api_key),
        range_policy = ?config.estimator.range_policy,
        static_dir = ?config.server.static_dir,
        "Configuration loaded"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
///
/// Routes are fixed at startup from the configuration loaded at that time;
/// handlers read the live configuration on every request.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<PrometheusHandle>>) -> Router {
    let config = state.config.load_full();

    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/estimate/options", get(handlers::estimate::estimate_options))
        .route("/api/estimate", post(handlers::estimate::handle_estimate))
        .route("/api/estimate/reserve", post(handlers::estimate::handle_reserve))
        .route("/api/chat/greeting", get(handlers::chat::greeting))
        .route("/api/chat", post(handlers::chat::handle_chat))
        .route("/api/chat/stream", post(handlers::chat::handle_chat_stream))
        .route("/api/contact/subjects", get(handlers::contact::contact_subjects))
        .route("/api/contact", post(handlers::contact::handle_contact))
        .with_state(state);

    let mut app = match metrics_handle {
        Some(handle) => api.merge(
            Router::new()
                .route(&config.metrics.endpoint, get(handlers::metrics_handler::metrics))
                .with_state(handle),
        ),
        None => api,
    };

    if let Some(dir) = &config.server.static_dir {
        info!("Serving site from {}", dir.display());
        app = app.fallback_service(static_files::site_service(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&config.server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
