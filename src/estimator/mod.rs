//! Estimator widget: user-editable inputs with a debounced display

pub mod debounce;
pub mod session;

pub use debounce::Debouncer;
pub use session::{EstimateView, EstimatorSession, DEFAULT_DISPLAY_DELAY, DEFAULT_REQUEST};
