use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chat::prompt::SYSTEM_INSTRUCTION;
use crate::pricing::calculator::MAX_BASE_RATE;
use crate::pricing::{PricingEngine, RangePolicy, RateCard, ServiceCategory};

/// Environment variable prefix, e.g. `SAVVY__CHAT__API_KEY`
pub const ENV_PREFIX: &str = "SAVVY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub estimator: EstimatorConfig,
    pub chat: ChatConfig,
    pub contact: ContactConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// "text" or "json"
    pub log_format: String,
    /// Built site to serve for every non-API path
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            static_dir: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub display_delay_ms: u64,
    pub range_policy: RangePolicy,
    /// Overrides of the default base rate per category
    pub base_rates: HashMap<ServiceCategory, u32>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            display_delay_ms: 400,
            range_policy: RangePolicy::Reject,
            base_rates: HashMap::new(),
        }
    }
}

impl EstimatorConfig {
    pub fn engine(&self) -> PricingEngine {
        PricingEngine::new(RateCard::with_overrides(&self.base_rates), self.range_policy)
    }

    pub fn display_delay(&self) -> Duration {
        Duration::from_millis(self.display_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    pub enabled: bool,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_message_chars: usize,
    /// Most recent history turns forwarded upstream
    pub max_history_turns: usize,
    /// Replaces the built-in assistant persona when set
    pub system_instruction: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_seconds: 60,
            max_message_chars: 500,
            max_history_turns: 20,
            system_instruction: None,
        }
    }
}

impl ChatConfig {
    pub fn system_instruction(&self) -> &str {
        self.system_instruction.as_deref().unwrap_or(SYSTEM_INSTRUCTION)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    pub submit_delay_ms: u64,
    pub reserve_delay_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            reserve_delay_ms: 2000,
        }
    }
}

impl ContactConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn reserve_delay(&self) -> Duration {
        Duration::from_millis(self.reserve_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Load configuration from `path` (optional) layered with `SAVVY__*` variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }

    if !matches!(cfg.server.log_format.as_str(), "text" | "json") {
        anyhow::bail!(
            "server.log_format must be 'text' or 'json', got '{}'",
            cfg.server.log_format
        );
    }

    if let Some(dir) = &cfg.server.static_dir {
        if !dir.is_dir() {
            anyhow::bail!("server.static_dir '{}' is not a directory", dir.display());
        }
    }

    if cfg.estimator.display_delay_ms > 10_000 {
        anyhow::bail!("estimator.display_delay_ms must not exceed 10000");
    }

    for (category, rate) in &cfg.estimator.base_rates {
        if *rate == 0 || *rate > MAX_BASE_RATE {
            anyhow::bail!(
                "estimator.base_rates.{} must be between 1 and {}, got {}",
                category,
                MAX_BASE_RATE,
                rate
            );
        }
    }

    if cfg.chat.enabled {
        if cfg.chat.api_key.trim().is_empty() {
            anyhow::bail!("chat.api_key must be set when chat is enabled");
        }
        if !cfg.chat.base_url.starts_with("http://") && !cfg.chat.base_url.starts_with("https://") {
            anyhow::bail!("chat.base_url must be an http(s) URL");
        }
        if cfg.chat.model.trim().is_empty() {
            anyhow::bail!("chat.model cannot be empty");
        }
    }

    if cfg.chat.max_message_chars == 0 {
        anyhow::bail!("chat.max_message_chars must be greater than zero");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("metrics.endpoint must start with '/'");
    }

    Ok(())
}
