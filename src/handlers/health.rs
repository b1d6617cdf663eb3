use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "savvy-it",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
///
/// Nothing to warm up: pricing is pure and the chat relay is stateless.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "ready",
        "service": "savvy-it",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_check_returns_ok() {
        let response = readiness_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
