use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::pricing::error::EstimateError;
use crate::pricing::models::{
    EstimateBreakdown, EstimateRequest, EstimateResult, ServiceCategory, Urgency,
};

/// Base rate for a category with no entry in the rate card
pub const FALLBACK_BASE_RATE: u32 = 50;

/// Largest base rate a rate card may carry; keeps every amount well inside `u32`
pub const MAX_BASE_RATE: u32 = 1_000_000;

/// Default base rate per category
pub const DEFAULT_BASE_RATES: [(ServiceCategory, u32); 4] = [
    (ServiceCategory::TechSupport, 50),
    (ServiceCategory::AiAutomation, 180),
    (ServiceCategory::SystemOverhaul, 280),
    (ServiceCategory::Coaching, 120),
];

/// Complexity multiplier is `COMPLEXITY_STEP * level + COMPLEXITY_OFFSET`
pub const COMPLEXITY_STEP: f64 = 0.6;
pub const COMPLEXITY_OFFSET: f64 = 0.4;

/// Surcharge per device beyond the first
pub const DEVICE_SURCHARGE: u32 = 35;

pub const STANDARD_MULTIPLIER: f64 = 1.0;
pub const EMERGENCY_MULTIPLIER: f64 = 1.75;

pub const COMPLEXITY_RANGE: RangeInclusive<i32> = 1..=4;
pub const DEVICE_RANGE: RangeInclusive<i32> = 1..=15;

/// What to do with a complexity or device count outside its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Fail with [`EstimateError::OutOfRangeInput`]
    #[default]
    Reject,
    /// Clamp into range and compute
    Clamp,
}

/// Category to base rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCard {
    rates: [Option<u32>; ServiceCategory::COUNT],
}

impl Default for RateCard {
    fn default() -> Self {
        let mut card = Self::empty();
        for (category, rate) in DEFAULT_BASE_RATES {
            card.rates[category.index()] = Some(rate);
        }
        card
    }
}

impl RateCard {
    /// A card with no entries; every category uses [`FALLBACK_BASE_RATE`]
    pub fn empty() -> Self {
        Self {
            rates: [None; ServiceCategory::COUNT],
        }
    }

    /// Default card with the given entries replaced
    pub fn with_overrides(overrides: &HashMap<ServiceCategory, u32>) -> Self {
        overrides
            .iter()
            .fold(Self::default(), |card, (category, rate)| {
                card.with_rate(*category, *rate)
            })
    }

    pub fn with_rate(mut self, category: ServiceCategory, rate: u32) -> Self {
        self.rates[category.index()] = Some(rate);
        self
    }

    pub fn without(mut self, category: ServiceCategory) -> Self {
        self.rates[category.index()] = None;
        self
    }

    pub fn base_rate(&self, category: ServiceCategory) -> u32 {
        self.rates[category.index()].unwrap_or(FALLBACK_BASE_RATE)
    }
}

/// Multiplier for a complexity level: 1.0, 1.6, 2.2, 2.8 for levels 1 to 4
pub fn complexity_multiplier(level: i32) -> f64 {
    f64::from(level) * COMPLEXITY_STEP + COMPLEXITY_OFFSET
}

/// Flat surcharge for every device after the first
pub fn device_surcharge(devices: i32) -> u32 {
    DEVICE_SURCHARGE * u32::try_from(devices - 1).unwrap_or(0)
}

pub fn urgency_multiplier(urgency: Urgency) -> f64 {
    match urgency {
        Urgency::Standard => STANDARD_MULTIPLIER,
        Urgency::Emergency => EMERGENCY_MULTIPLIER,
    }
}

/// Deterministic price estimator
///
/// Amounts are rounded with `f64::round`, i.e. half away from zero. Every
/// intermediate is non-negative, so this matches round-half-up: a subtotal
/// of exactly 87.5 is quoted as 88.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricingEngine {
    rate_card: RateCard,
    policy: RangePolicy,
}

impl PricingEngine {
    pub fn new(rate_card: RateCard, policy: RangePolicy) -> Self {
        Self { rate_card, policy }
    }

    pub fn rate_card(&self) -> &RateCard {
        &self.rate_card
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Check a request against the input ranges
    ///
    /// Returns the request that will actually be priced: unchanged under
    /// [`RangePolicy::Reject`], clamped under [`RangePolicy::Clamp`].
    pub fn validate(&self, request: &EstimateRequest) -> Result<EstimateRequest, EstimateError> {
        Ok(EstimateRequest {
            complexity: self.check_range("complexity", request.complexity, COMPLEXITY_RANGE)?,
            devices: self.check_range("devices", request.devices, DEVICE_RANGE)?,
            ..*request
        })
    }

    fn check_range(
        &self,
        field: &'static str,
        value: i32,
        range: RangeInclusive<i32>,
    ) -> Result<i32, EstimateError> {
        if range.contains(&value) {
            return Ok(value);
        }
        match self.policy {
            RangePolicy::Clamp => Ok(value.clamp(*range.start(), *range.end())),
            RangePolicy::Reject => Err(EstimateError::OutOfRangeInput {
                field,
                value,
                min: *range.start(),
                max: *range.end(),
            }),
        }
    }

    pub fn breakdown(&self, request: &EstimateRequest) -> Result<EstimateBreakdown, EstimateError> {
        let request = self.validate(request)?;

        let base_rate = self.rate_card.base_rate(request.service);
        if base_rate > MAX_BASE_RATE {
            return Err(EstimateError::OutOfRangeInput {
                field: "base_rate",
                value: i32::try_from(base_rate).unwrap_or(i32::MAX),
                min: 1,
                max: MAX_BASE_RATE as i32,
            });
        }
        let complexity_multiplier = complexity_multiplier(request.complexity);
        let device_surcharge = device_surcharge(request.devices);
        let subtotal = f64::from(base_rate) * complexity_multiplier + f64::from(device_surcharge);
        let urgency_multiplier = urgency_multiplier(request.urgency);
        let amount = (subtotal * urgency_multiplier).round() as u32;

        Ok(EstimateBreakdown {
            base_rate,
            complexity_multiplier,
            device_surcharge,
            subtotal,
            urgency_multiplier,
            amount,
        })
    }

    pub fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult, EstimateError> {
        self.breakdown(request).map(|breakdown| breakdown.result())
    }
}

/// Price a request with the default rate card, rejecting out-of-range input
pub fn estimate(request: &EstimateRequest) -> Result<EstimateResult, EstimateError> {
    PricingEngine::default().estimate(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        service: ServiceCategory,
        complexity: i32,
        devices: i32,
        urgency: Urgency,
    ) -> EstimateRequest {
        EstimateRequest::new(service, complexity, devices, urgency)
    }

    fn amount(
        service: ServiceCategory,
        complexity: i32,
        devices: i32,
        urgency: Urgency,
    ) -> u32 {
        estimate(&request(service, complexity, devices, urgency)).unwrap().amount
    }

    fn all_valid_requests() -> Vec<EstimateRequest> {
        let mut requests = Vec::new();
        for service in ServiceCategory::ALL {
            for complexity in COMPLEXITY_RANGE {
                for devices in DEVICE_RANGE {
                    for urgency in [Urgency::Standard, Urgency::Emergency] {
                        requests.push(request(service, complexity, devices, urgency));
                    }
                }
            }
        }
        requests
    }

    #[test]
    fn test_known_scenarios() {
        assert_eq!(amount(ServiceCategory::TechSupport, 1, 1, Urgency::Standard), 50);
        assert_eq!(amount(ServiceCategory::AiAutomation, 2, 1, Urgency::Standard), 288);
        assert_eq!(amount(ServiceCategory::SystemOverhaul, 4, 3, Urgency::Standard), 854);
        assert_eq!(amount(ServiceCategory::Coaching, 3, 1, Urgency::Emergency), 462);
        assert_eq!(amount(ServiceCategory::TechSupport, 1, 15, Urgency::Standard), 540);
    }

    #[test]
    fn test_half_rounds_up() {
        // 50 * 1.75 = 87.5
        assert_eq!(amount(ServiceCategory::TechSupport, 1, 1, Urgency::Emergency), 88);
    }

    #[test]
    fn test_complexity_multipliers() {
        let expected = [1.0, 1.6, 2.2, 2.8];
        for (level, want) in COMPLEXITY_RANGE.zip(expected) {
            assert!((complexity_multiplier(level) - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let engine = PricingEngine::default();
        for req in all_valid_requests() {
            assert_eq!(engine.estimate(&req), engine.estimate(&req));
        }
    }

    #[test]
    fn test_monotonic_in_complexity() {
        for service in ServiceCategory::ALL {
            for devices in DEVICE_RANGE {
                for urgency in [Urgency::Standard, Urgency::Emergency] {
                    let amounts: Vec<u32> = COMPLEXITY_RANGE
                        .map(|c| amount(service, c, devices, urgency))
                        .collect();
                    assert!(
                        amounts.windows(2).all(|w| w[0] <= w[1]),
                        "{service} {devices} {urgency}: {amounts:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_devices() {
        for service in ServiceCategory::ALL {
            for complexity in COMPLEXITY_RANGE {
                for urgency in [Urgency::Standard, Urgency::Emergency] {
                    let amounts: Vec<u32> = DEVICE_RANGE
                        .map(|d| amount(service, complexity, d, urgency))
                        .collect();
                    assert!(
                        amounts.windows(2).all(|w| w[0] <= w[1]),
                        "{service} {complexity} {urgency}: {amounts:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_emergency_applies_to_subtotal() {
        let engine = PricingEngine::default();
        for req in all_valid_requests().into_iter().filter(|r| r.urgency == Urgency::Standard) {
            let standard = engine.breakdown(&req).unwrap();
            let emergency = engine
                .breakdown(&EstimateRequest { urgency: Urgency::Emergency, ..req })
                .unwrap();

            assert_eq!(standard.subtotal, emergency.subtotal);
            assert_eq!(emergency.amount, (standard.subtotal * 1.75).round() as u32);
        }
    }

    #[test]
    fn test_single_device_has_no_surcharge() {
        let engine = PricingEngine::default();
        for req in all_valid_requests().into_iter().filter(|r| r.devices == 1) {
            assert_eq!(engine.breakdown(&req).unwrap().device_surcharge, 0);
        }
    }

    #[test]
    fn test_oversized_base_rate_is_an_error() {
        let engine = PricingEngine::new(
            RateCard::default().with_rate(ServiceCategory::SystemOverhaul, 4_000_000_000),
            RangePolicy::Reject,
        );

        let err = engine
            .estimate(&request(ServiceCategory::SystemOverhaul, 4, 15, Urgency::Emergency))
            .unwrap_err();
        assert!(matches!(err, EstimateError::OutOfRangeInput { field: "base_rate", .. }));
    }

    #[test]
    fn test_largest_base_rate_fits() {
        let engine = PricingEngine::new(
            RateCard::default().with_rate(ServiceCategory::SystemOverhaul, MAX_BASE_RATE),
            RangePolicy::Reject,
        );

        let result = engine
            .estimate(&request(ServiceCategory::SystemOverhaul, 4, 15, Urgency::Emergency))
            .unwrap();
        // (1_000_000 * 2.8 + 490) * 1.75
        assert!((4_900_857..=4_900_858).contains(&result.amount));
    }

    #[test]
    fn test_reject_policy_reports_out_of_range() {
        let engine = PricingEngine::default();

        let err = engine
            .estimate(&request(ServiceCategory::Coaching, 5, 1, Urgency::Standard))
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::OutOfRangeInput {
                field: "complexity",
                value: 5,
                min: 1,
                max: 4
            }
        );

        let err = engine
            .estimate(&request(ServiceCategory::Coaching, 2, 0, Urgency::Standard))
            .unwrap_err();
        assert!(matches!(err, EstimateError::OutOfRangeInput { field: "devices", value: 0, .. }));
        assert_eq!(err.to_string(), "devices must be between 1 and 15, got 0");
    }

    #[test]
    fn test_clamp_policy_prices_boundary() {
        let engine = PricingEngine::new(RateCard::default(), RangePolicy::Clamp);

        let clamped = engine
            .estimate(&request(ServiceCategory::TechSupport, 9, 40, Urgency::Standard))
            .unwrap();
        let boundary = engine
            .estimate(&request(ServiceCategory::TechSupport, 4, 15, Urgency::Standard))
            .unwrap();
        assert_eq!(clamped, boundary);

        let validated = engine
            .validate(&request(ServiceCategory::TechSupport, -3, 0, Urgency::Standard))
            .unwrap();
        assert_eq!(validated.complexity, 1);
        assert_eq!(validated.devices, 1);
    }

    #[test]
    fn test_missing_rate_falls_back() {
        let card = RateCard::default().without(ServiceCategory::SystemOverhaul);
        assert_eq!(card.base_rate(ServiceCategory::SystemOverhaul), FALLBACK_BASE_RATE);
        assert_eq!(card.base_rate(ServiceCategory::Coaching), 120);

        let empty = RateCard::empty();
        for category in ServiceCategory::ALL {
            assert_eq!(empty.base_rate(category), FALLBACK_BASE_RATE);
        }
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert(ServiceCategory::Coaching, 150);
        let engine = PricingEngine::new(RateCard::with_overrides(&overrides), RangePolicy::Reject);

        let breakdown = engine
            .breakdown(&request(ServiceCategory::Coaching, 1, 1, Urgency::Standard))
            .unwrap();
        assert_eq!(breakdown.base_rate, 150);
        assert_eq!(breakdown.amount, 150);
        assert_eq!(engine.rate_card().base_rate(ServiceCategory::AiAutomation), 180);
    }
}
