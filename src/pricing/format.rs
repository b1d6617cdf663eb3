use serde::Serialize;

use crate::pricing::models::EstimateBreakdown;

/// Unit shown after every quoted amount
pub const CURRENCY_SUFFIX: &str = "AUD*";

/// Caption above the quoted amount
pub const HEADLINE: &str = "Projected Investment Starting At";

/// Fine print under the quoted amount
pub const DISCLAIMER: &str = "Subject to strategic discovery and technical audit.";

/// Placeholder while a display is pending
pub const CALCULATING_PLACEHOLDER: &str = "...";

pub fn format_amount(amount: u32) -> String {
    format!("${}", amount)
}

/// An estimate as the widget presents it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedEstimate {
    pub amount: u32,
    pub display: String,
    pub suffix: &'static str,
    pub headline: &'static str,
    pub disclaimer: &'static str,
    pub breakdown: EstimateBreakdown,
}

impl From<EstimateBreakdown> for QuotedEstimate {
    fn from(breakdown: EstimateBreakdown) -> Self {
        Self {
            amount: breakdown.amount,
            display: format_amount(breakdown.amount),
            suffix: CURRENCY_SUFFIX,
            headline: HEADLINE,
            disclaimer: DISCLAIMER,
            breakdown,
        }
    }
}

impl QuotedEstimate {
    /// One-line rendering, e.g. `$854 AUD*`
    pub fn summary(&self) -> String {
        format!("{} {}", self.display, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{estimate_breakdown, EstimateRequest, ServiceCategory, Urgency};

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(2230), "$2230");
    }

    #[test]
    fn test_quoted_estimate_summary() {
        let breakdown = estimate_breakdown(&EstimateRequest::new(
            ServiceCategory::SystemOverhaul,
            4,
            3,
            Urgency::Standard,
        ))
        .unwrap();
        let quote = QuotedEstimate::from(breakdown);

        assert_eq!(quote.amount, 854);
        assert_eq!(quote.summary(), "$854 AUD*");
        assert_eq!(quote.disclaimer, DISCLAIMER);
    }
}
