use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    contact::{self, Reservation},
    error::AppError,
    handlers::AppState,
    metrics,
    pricing::{EstimateError, EstimateOptions, EstimateRequest, QuotedEstimate},
};

/// Handle GET /api/estimate/options
pub async fn estimate_options(State(state): State<AppState>) -> Json<EstimateOptions> {
    let engine = state.config.load().estimator.engine();
    Json(EstimateOptions::for_engine(&engine))
}

/// Handle POST /api/estimate
pub async fn handle_estimate(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<QuotedEstimate>, AppError> {
    let Json(request) = payload.inspect_err(|_| metrics::record_estimate_rejected("invalid_body"))?;
    let engine = state.config.load().estimator.engine();

    let breakdown = engine
        .breakdown(&request)
        .inspect_err(|e| metrics::record_estimate_rejected(rejection_reason(e)))?;

    tracing::debug!(
        service = %request.service,
        complexity = request.complexity,
        devices = request.devices,
        urgency = request.urgency.as_str(),
        amount = breakdown.amount,
        "Computed estimate"
    );
    metrics::record_estimate(request.service.slug(), request.urgency.as_str());

    Ok(Json(QuotedEstimate::from(breakdown)))
}

/// Handle POST /api/estimate/reserve
pub async fn handle_reserve(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<Reservation>, AppError> {
    let Json(request) = payload?;
    let config = state.config.load_full();
    let engine = config.estimator.engine();

    let reservation =
        contact::reserve_slot(&engine, &request, config.contact.reserve_delay()).await?;
    Ok(Json(reservation))
}

fn rejection_reason(error: &EstimateError) -> &'static str {
    match error {
        EstimateError::OutOfRangeInput { .. } => "out_of_range",
        EstimateError::UnknownCategory(_) => "unknown_category",
        EstimateError::UnknownUrgency(_) => "unknown_urgency",
    }
}
