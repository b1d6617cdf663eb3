use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;

use crate::estimator::debounce::Debouncer;
use crate::pricing::format::{format_amount, CALCULATING_PLACEHOLDER, CURRENCY_SUFFIX};
use crate::pricing::{
    EstimateError, EstimateRequest, PricingEngine, ServiceCategory, Urgency,
};

/// Display delay used by the site
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(400);

/// Initial inputs of the estimator widget
pub const DEFAULT_REQUEST: EstimateRequest = EstimateRequest {
    service: ServiceCategory::TechSupport,
    complexity: 2,
    devices: 1,
    urgency: Urgency::Standard,
};

/// What the widget currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimateView {
    /// A newer amount has been computed but is not displayed yet
    pub calculating: bool,
    /// Last displayed amount, `None` before the first display
    pub amount: Option<u32>,
}

impl EstimateView {
    pub fn render(&self) -> String {
        match (self.calculating, self.amount) {
            (false, Some(amount)) => format!("{} {}", format_amount(amount), CURRENCY_SUFFIX),
            _ => format!("{} {}", CALCULATING_PLACEHOLDER, CURRENCY_SUFFIX),
        }
    }
}

/// State machine behind the cost estimator widget
///
/// Holds the four inputs. Every change is priced immediately; the result is
/// published to subscribers only after the display delay, and a newer
/// change cancels the pending publication.
pub struct EstimatorSession {
    engine: PricingEngine,
    request: EstimateRequest,
    latest_amount: u32,
    view: watch::Sender<EstimateView>,
    debouncer: Debouncer,
}

impl EstimatorSession {
    /// Start a session with the widget defaults. Requires a tokio runtime.
    pub fn new(engine: PricingEngine, display_delay: Duration) -> Result<Self, EstimateError> {
        Self::with_request(engine, display_delay, DEFAULT_REQUEST)
    }

    pub fn with_request(
        engine: PricingEngine,
        display_delay: Duration,
        request: EstimateRequest,
    ) -> Result<Self, EstimateError> {
        let (view, _) = watch::channel(EstimateView {
            calculating: true,
            amount: None,
        });

        let mut session = Self {
            engine,
            request,
            latest_amount: 0,
            view,
            debouncer: Debouncer::new(display_delay),
        };
        session.apply(request)?;
        Ok(session)
    }

    pub fn request(&self) -> &EstimateRequest {
        &self.request
    }

    /// Amount for the current inputs, whether or not it is displayed yet
    pub fn latest_amount(&self) -> u32 {
        self.latest_amount
    }

    pub fn current(&self) -> EstimateView {
        *self.view.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<EstimateView> {
        self.view.subscribe()
    }

    pub fn set_category(&mut self, service: ServiceCategory) -> Result<u32, EstimateError> {
        self.apply(EstimateRequest {
            service,
            ..self.request
        })
    }

    pub fn set_complexity(&mut self, complexity: i32) -> Result<u32, EstimateError> {
        self.apply(EstimateRequest {
            complexity,
            ..self.request
        })
    }

    pub fn set_devices(&mut self, devices: i32) -> Result<u32, EstimateError> {
        self.apply(EstimateRequest {
            devices,
            ..self.request
        })
    }

    pub fn set_urgency(&mut self, urgency: Urgency) -> Result<u32, EstimateError> {
        self.apply(EstimateRequest {
            urgency,
            ..self.request
        })
    }

    /// Price `candidate` and schedule its display
    ///
    /// A rejected candidate leaves the inputs and the pending display
    /// untouched.
    fn apply(&mut self, candidate: EstimateRequest) -> Result<u32, EstimateError> {
        let request = self.engine.validate(&candidate)?;
        let amount = self.engine.estimate(&request)?.amount;

        self.request = request;
        self.latest_amount = amount;
        self.view.send_modify(|view| view.calculating = true);

        tracing::debug!(
            service = %request.service,
            complexity = request.complexity,
            devices = request.devices,
            urgency = %request.urgency,
            amount,
            "Estimate recomputed"
        );

        let view = self.view.clone();
        self.debouncer.schedule(async move {
            view.send_replace(EstimateView {
                calculating: false,
                amount: Some(amount),
            });
        });

        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{RangePolicy, RateCard};

    fn pending(amount: Option<u32>) -> EstimateView {
        EstimateView {
            calculating: true,
            amount,
        }
    }

    fn shown(amount: u32) -> EstimateView {
        EstimateView {
            calculating: false,
            amount: Some(amount),
        }
    }

    fn session() -> EstimatorSession {
        EstimatorSession::new(PricingEngine::default(), DEFAULT_DISPLAY_DELAY).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_estimate_is_displayed_after_delay() {
        let session = session();
        assert_eq!(session.current(), pending(None));
        assert_eq!(session.current().render(), "... AUD*");

        tokio::time::sleep(Duration::from_millis(401)).await;

        // TechSupport, Standard complexity, one device: 50 * 1.6
        assert_eq!(session.current(), shown(80));
        assert_eq!(session.current().render(), "$80 AUD*");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_display_only_last() {
        let mut session = session();
        tokio::time::sleep(Duration::from_millis(401)).await;

        assert_eq!(session.set_devices(3).unwrap(), 150);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(session.set_devices(5).unwrap(), 220);
        tokio::time::sleep(Duration::from_millis(300)).await;

        // The first change would have displayed by now had it not been cancelled
        assert_eq!(session.current(), pending(Some(80)));

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert_eq!(session.current(), shown(220));
    }

    #[tokio::test(start_paused = true)]
    async fn test_computation_is_immediate() {
        let mut session = session();

        let amount = session.set_category(ServiceCategory::Coaching).unwrap();
        assert_eq!(amount, 192);
        assert_eq!(session.latest_amount(), 192);
        assert!(session.current().calculating);

        session.set_complexity(3).unwrap();
        assert_eq!(session.set_urgency(Urgency::Emergency).unwrap(), 462);
        assert_eq!(session.request().service, ServiceCategory::Coaching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_change_keeps_state() {
        let mut session = session();
        tokio::time::sleep(Duration::from_millis(401)).await;

        let err = session.set_devices(16).unwrap_err();
        assert!(matches!(err, EstimateError::OutOfRangeInput { field: "devices", .. }));
        assert_eq!(session.request().devices, 1);
        assert_eq!(session.current(), shown(80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamp_policy_stores_clamped_input() {
        let engine = PricingEngine::new(RateCard::default(), RangePolicy::Clamp);
        let mut session = EstimatorSession::new(engine, DEFAULT_DISPLAY_DELAY).unwrap();

        session.set_complexity(7).unwrap();
        assert_eq!(session.request().complexity, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_published_value() {
        let mut session = session();
        let mut rx = session.subscribe();

        session.set_category(ServiceCategory::AiAutomation).unwrap();
        rx.changed().await.unwrap();
        while rx.borrow_and_update().calculating {
            rx.changed().await.unwrap();
        }

        assert_eq!(rx.borrow().amount, Some(288));
    }
}
