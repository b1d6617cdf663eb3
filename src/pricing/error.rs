use thiserror::Error;

/// Errors raised while validating estimator input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRangeInput {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("unknown service category '{0}'")]
    UnknownCategory(String),

    #[error("unknown urgency '{0}'")]
    UnknownUrgency(String),
}
