//! Contact form and "Reserve Priority Slot" submissions
//!
//! Both are simulated: after a fixed delay the request is acknowledged.
//! Nothing is sent anywhere and nothing is stored.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::metrics;
use crate::pricing::{EstimateError, EstimateRequest, PricingEngine};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Subjects offered by the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactSubject {
    #[default]
    #[serde(rename = "Book a Tech Tune-Up")]
    TechTuneUp,
    #[serde(rename = "Training & Coaching Sessions")]
    TrainingAndCoaching,
    #[serde(rename = "AI & Automation Audit")]
    AiAutomationAudit,
    #[serde(rename = "Ask a Quick Question")]
    QuickQuestion,
}

impl ContactSubject {
    pub const ALL: [ContactSubject; 4] = [
        ContactSubject::TechTuneUp,
        ContactSubject::TrainingAndCoaching,
        ContactSubject::AiAutomationAudit,
        ContactSubject::QuickQuestion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TechTuneUp => "Book a Tech Tune-Up",
            Self::TrainingAndCoaching => "Training & Coaching Sessions",
            Self::AiAutomationAudit => "AI & Automation Audit",
            Self::QuickQuestion => "Ask a Quick Question",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: ContactSubject,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::MissingField("email"));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingField("message"));
        }
        Ok(())
    }
}

/// Same acceptance as a browser `type="email"` field: `local@domain`, no spaces
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    pub status: &'static str,
    pub subject: ContactSubject,
}

/// Validate the form, wait `delay`, acknowledge
pub async fn submit_contact(
    form: &ContactForm,
    delay: Duration,
) -> Result<ContactReceipt, ContactError> {
    if let Err(e) = form.validate() {
        metrics::record_submission("contact", "rejected");
        return Err(e);
    }

    tracing::info!(subject = form.subject.label(), "Contact form submitted");
    tokio::time::sleep(delay).await;
    metrics::record_submission("contact", "success");

    Ok(ContactReceipt {
        status: "success",
        subject: form.subject,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub status: &'static str,
    pub reference: Uuid,
    pub amount: u32,
    pub request: EstimateRequest,
    pub requested_at: String,
}

/// Price the request, wait `delay`, acknowledge with a reference id
pub async fn reserve_slot(
    engine: &PricingEngine,
    request: &EstimateRequest,
    delay: Duration,
) -> Result<Reservation, ContactError> {
    let priced = engine.validate(request).and_then(|valid| {
        engine.estimate(&valid).map(|result| (valid, result.amount))
    });
    let (request, amount) = match priced {
        Ok(priced) => priced,
        Err(e) => {
            metrics::record_submission("reservation", "rejected");
            return Err(e.into());
        }
    };

    let reference = Uuid::new_v4();
    tracing::info!(%reference, service = %request.service, amount, "Priority slot requested");
    tokio::time::sleep(delay).await;
    metrics::record_submission("reservation", "success");

    Ok(Reservation {
        status: "reserved",
        reference,
        amount,
        request,
        requested_at: chrono::Utc::now().to_rfc3339(),
    })
}
