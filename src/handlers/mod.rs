pub mod chat;
pub mod contact;
pub mod estimate;
pub mod health;
pub mod metrics_handler;

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::chat::ChatRelay;
use crate::config::Config;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Arc<ArcSwap<Config>>, http_client: reqwest::Client) -> Self {
        Self { config, http_client }
    }

    /// Relay bound to the chat settings currently loaded
    pub fn chat_relay(&self) -> ChatRelay {
        ChatRelay::new(self.http_client.clone(), self.config.load().chat.clone())
    }
}
