use thiserror::Error;

/// Errors raised by the corporate-action adjustment engine.
#[derive(Error, Debug)]
pub enum AdjustmentError {
    #[error("Unsupported corporate action kind: {0}")]
    UnsupportedKind(String),

    #[error("Invalid adjustment payload: {0}")]
    InvalidPayload(String),

    #[error("Adjustment not found: {0}")]
    NotFound(String),
}
