use crate::{
    config::ChatConfig,
    error::AppError,
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};
use reqwest::Client;
use std::time::Duration;

fn model_url(config: &ChatConfig, method: &str) -> String {
    format!(
        "{}/models/{}:{}",
        config.base_url.trim_end_matches('/'),
        config.model,
        method
    )
}

async fn send(
    client: &Client,
    config: &ChatConfig,
    method: &str,
    request: &GenerateContentRequest,
    stream: bool,
) -> Result<reqwest::Response, AppError> {
    if config.api_key.is_empty() {
        return Err(AppError::ConfigError(
            "No Gemini API key configured".to_string(),
        ));
    }

    let mut builder = client
        .post(model_url(config, method))
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(config.timeout_seconds))
        .query(&[("key", config.api_key.as_str())]);

    if stream {
        builder = builder.query(&[("alt", "sse")]);
    }

    let response = builder.json(request).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::UpstreamError {
            status,
            message: error_text,
        });
    }

    Ok(response)
}

/// Call Gemini Generate Content API
pub async fn generate_content(
    client: &Client,
    config: &ChatConfig,
    request: &GenerateContentRequest,
) -> Result<GenerateContentResponse, AppError> {
    let response = send(client, config, "generateContent", request, false).await?;
    Ok(response.json().await?)
}

/// Call Gemini Stream Generate Content API
///
/// Returns the raw response; its body is a server-sent event stream of
/// [`GenerateContentResponse`] chunks.
pub async fn stream_generate_content(
    client: &Client,
    config: &ChatConfig,
    request: &GenerateContentRequest,
) -> Result<reqwest::Response, AppError> {
    send(client, config, "streamGenerateContent", request, true).await
}
