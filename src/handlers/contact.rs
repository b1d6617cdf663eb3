use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    contact::{self, ContactForm, ContactReceipt, ContactSubject},
    error::AppError,
    handlers::AppState,
};

/// Handle GET /api/contact/subjects
pub async fn contact_subjects() -> Json<Vec<&'static str>> {
    Json(ContactSubject::ALL.iter().map(ContactSubject::label).collect())
}

/// Handle POST /api/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<ContactReceipt>, AppError> {
    let Json(form) = payload?;
    let delay = state.config.load().contact.submit_delay();
    let receipt = contact::submit_contact(&form, delay).await?;
    Ok(Json(receipt))
}
