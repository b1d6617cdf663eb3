use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pricing::error::EstimateError;

/// Service category offered by the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    #[default]
    TechSupport,
    AiAutomation,
    SystemOverhaul,
    Coaching,
}

impl ServiceCategory {
    pub const COUNT: usize = 4;

    /// Every category, in the order the site lists them
    pub const ALL: [ServiceCategory; Self::COUNT] = [
        ServiceCategory::TechSupport,
        ServiceCategory::AiAutomation,
        ServiceCategory::SystemOverhaul,
        ServiceCategory::Coaching,
    ];

    /// Wire identifier used by the browser widget
    pub fn slug(&self) -> &'static str {
        match self {
            Self::TechSupport => "tech-support",
            Self::AiAutomation => "ai-automation",
            Self::SystemOverhaul => "system-overhaul",
            Self::Coaching => "coaching",
        }
    }

    /// Button label shown on the estimator
    pub fn label(&self) -> &'static str {
        match self {
            Self::TechSupport => "Technical Fixes",
            Self::AiAutomation => "AI & Automation",
            Self::SystemOverhaul => "System Overhaul",
            Self::Coaching => "1-on-1 Strategy",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceCategory {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == normalized)
            .ok_or_else(|| EstimateError::UnknownCategory(s.to_string()))
    }
}

/// Delivery urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    #[serde(rename = "normal", alias = "standard")]
    Standard,
    #[serde(rename = "emergency")]
    Emergency,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "normal",
            Self::Emergency => "emergency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Emergency => "Immediate",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "standard" => Ok(Self::Standard),
            "emergency" | "immediate" => Ok(Self::Emergency),
            _ => Err(EstimateError::UnknownUrgency(s.to_string())),
        }
    }
}

/// Labels for complexity levels 1 through 4
pub const COMPLEXITY_LABELS: [&str; 4] = ["Minimal", "Standard", "Complex", "Enterprise"];

/// Label for a complexity level, `None` when the level is out of range
pub fn complexity_label(level: i32) -> Option<&'static str> {
    usize::try_from(level)
        .ok()
        .and_then(|level| level.checked_sub(1))
        .and_then(|idx| COMPLEXITY_LABELS.get(idx).copied())
}

/// Input to a single price computation
///
/// Built fresh on every input change. Integer fields are signed so that
/// out-of-range values coming off the wire can be reported instead of
/// failing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub service: ServiceCategory,
    pub complexity: i32,
    pub devices: i32,
    #[serde(default)]
    pub urgency: Urgency,
}

impl EstimateRequest {
    pub fn new(service: ServiceCategory, complexity: i32, devices: i32, urgency: Urgency) -> Self {
        Self {
            service,
            complexity,
            devices,
            urgency,
        }
    }
}

/// Output of a price computation, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub amount: u32,
}

/// Every intermediate value of a computation, for display and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub base_rate: u32,
    pub complexity_multiplier: f64,
    pub device_surcharge: u32,
    pub subtotal: f64,
    pub urgency_multiplier: f64,
    pub amount: u32,
}

impl EstimateBreakdown {
    pub fn result(&self) -> EstimateResult {
        EstimateResult {
            amount: self.amount,
        }
    }
}
