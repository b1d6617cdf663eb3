//! Chat assistant relay
//!
//! The browser holds the transcript; each request carries the new message
//! and the history. Upstream failures never reach the caller as errors:
//! they are replaced by [`prompt::FALLBACK_MESSAGE`].

pub mod models;
pub mod prompt;
pub mod relay;

use thiserror::Error;

pub use models::{ChatMessage, ChatReply, ChatRequest, ChatRole, ChatStreamEvent};
pub use relay::ChatRelay;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("message is {length} characters, the limit is {max}")]
    MessageTooLong { length: usize, max: usize },

    #[error("the chat assistant is not enabled")]
    Disabled,
}
