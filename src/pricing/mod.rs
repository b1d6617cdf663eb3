//! Price estimation for the site's cost estimator
//!
//! A pure function of four inputs. The rate card, multipliers and input
//! ranges are the constants in [`calculator`].

pub mod calculator;
pub mod error;
pub mod format;
pub mod models;
pub mod options;

pub use calculator::{estimate, PricingEngine, RangePolicy, RateCard};
pub use error::EstimateError;
pub use format::QuotedEstimate;
pub use models::{EstimateBreakdown, EstimateRequest, EstimateResult, ServiceCategory, Urgency};
pub use options::EstimateOptions;

/// Breakdown for a request with the default engine
pub fn estimate_breakdown(request: &EstimateRequest) -> Result<EstimateBreakdown, EstimateError> {
    PricingEngine::default().breakdown(request)
}
