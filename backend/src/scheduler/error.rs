//! Error types for the ranking engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for ranking operations
pub type SchedulingResult<T> = std::result::Result<T, SchedulingError>;

/// Caller-input validation failures. Neither is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// The search window is empty or inverted.
    #[error("Invalid range: window start {start} must be before window end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A duration or quorum constraint is out of bounds.
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),
}

impl SchedulingError {
    pub fn invalid_constraint(message: impl Into<String>) -> Self {
        Self::InvalidConstraint(message.into())
    }
}
