use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder
///
/// Fails if a recorder is already installed for this process.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!("savvy_estimates_total", "Total number of estimates computed");
    describe_counter!(
        "savvy_estimates_rejected_total",
        "Estimate requests rejected by input validation"
    );
    describe_counter!("savvy_chat_requests_total", "Chat turns relayed, by outcome");
    describe_counter!("savvy_chat_tokens_total", "Tokens reported by the chat upstream");
    describe_histogram!(
        "savvy_chat_duration_seconds",
        "Time spent waiting for the chat upstream"
    );
    describe_counter!(
        "savvy_submissions_total",
        "Simulated contact and reservation submissions"
    );
    describe_gauge!("savvy_info", "Service version information");

    gauge!("savvy_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a computed estimate
pub fn record_estimate(service: &str, urgency: &str) {
    counter!(
        "savvy_estimates_total",
        "service" => service.to_string(),
        "urgency" => urgency.to_string(),
    )
    .increment(1);
}

/// Record an estimate request that failed validation
pub fn record_estimate_rejected(reason: &str) {
    counter!(
        "savvy_estimates_rejected_total",
        "reason" => reason.to_string(),
    )
    .increment(1);
}

/// Record a relayed chat turn; `outcome` is "success", "fallback" or "rejected"
pub fn record_chat(outcome: &str, streaming: bool) {
    counter!(
        "savvy_chat_requests_total",
        "outcome" => outcome.to_string(),
        "streaming" => streaming.to_string(),
    )
    .increment(1);
}

/// Record tokens
pub fn record_chat_tokens(model: &str, token_type: &str, count: u64) {
    counter!(
        "savvy_chat_tokens_total",
        "model" => model.to_string(),
        "type" => token_type.to_string(),
    )
    .increment(count);
}

/// Record upstream chat latency
pub fn record_chat_duration(model: &str, duration: Duration) {
    histogram!(
        "savvy_chat_duration_seconds",
        "model" => model.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a simulated submission; `kind` is "contact" or "reservation"
pub fn record_submission(kind: &str, outcome: &str) {
    counter!(
        "savvy_submissions_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}
