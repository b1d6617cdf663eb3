use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role name on the Gemini wire
    pub fn upstream_role(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// One user turn plus the transcript so far, as held by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// True when the reply is the canned apology
    pub fallback: bool,
}

/// Event of a streamed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamEvent {
    /// Next fragment of the assistant's reply
    Delta(String),
    /// Reply finished normally
    Done,
    /// Upstream failed; carries the apology. Always the last event.
    Fallback(String),
}

impl ChatStreamEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Delta(_) => "delta",
            Self::Done => "done",
            Self::Fallback(_) => "fallback",
        }
    }
}
