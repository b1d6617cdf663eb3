use serde::Serialize;

use crate::pricing::calculator::{PricingEngine, COMPLEXITY_RANGE, DEVICE_RANGE};
use crate::pricing::models::{complexity_label, ServiceCategory, Urgency};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub id: &'static str,
    pub label: &'static str,
    pub base_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplexityOption {
    pub level: i32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrgencyOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

/// Everything the browser needs to build the estimator controls
#[derive(Debug, Clone, Serialize)]
pub struct EstimateOptions {
    pub categories: Vec<CategoryOption>,
    pub complexity: Vec<ComplexityOption>,
    pub devices: DeviceRange,
    pub urgency: Vec<UrgencyOption>,
}

impl EstimateOptions {
    pub fn for_engine(engine: &PricingEngine) -> Self {
        let categories = ServiceCategory::ALL
            .into_iter()
            .map(|category| CategoryOption {
                id: category.slug(),
                label: category.label(),
                base_rate: engine.rate_card().base_rate(category),
            })
            .collect();

        let complexity = COMPLEXITY_RANGE
            .filter_map(|level| {
                complexity_label(level).map(|label| ComplexityOption { level, label })
            })
            .collect();

        let urgency = [Urgency::Standard, Urgency::Emergency]
            .into_iter()
            .map(|urgency| UrgencyOption {
                id: urgency.as_str(),
                label: urgency.label(),
            })
            .collect();

        Self {
            categories,
            complexity,
            devices: DeviceRange {
                min: *DEVICE_RANGE.start(),
                max: *DEVICE_RANGE.end(),
                step: 1,
            },
            urgency,
        }
    }
}
