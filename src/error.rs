use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::chat::ChatError;
use crate::contact::ContactError;
use crate::pricing::EstimateError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Configuration error
    ConfigError(String),
    /// Request body or parameters failed validation
    InvalidInput(String),
    /// The chat relay is turned off
    ChatDisabled(String),
    /// Upstream API error
    UpstreamError { status: StatusCode, message: String },
    /// HTTP request error
    HttpRequest(reqwest::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::ChatDisabled(msg) => write!(f, "Chat disabled: {}", msg),
            Self::UpstreamError { status, message } => {
                write!(f, "Upstream error ({}): {}", status, message)
            }
            Self::HttpRequest(err) => write!(f, "HTTP request error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ChatDisabled(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::UpstreamError { status, message } => (*status, message.clone()),
            Self::HttpRequest(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::InvalidInput(_) => "invalid_input",
        AppError::ChatDisabled(_) => "chat_disabled",
        AppError::UpstreamError { .. } => "upstream_error",
        AppError::HttpRequest(_) => "http_request_error",
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Disabled => Self::ChatDisabled(err.to_string()),
            _ => Self::InvalidInput(err.to_string()),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Estimate(inner) => inner.into(),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpRequest(err)
    }
}
