//! Detection and evaluation errors
//!
//! Same approach as `grainguard_core::errors`: small `Copy` enums with static
//! reasons. Insufficient data is *not* an error here; detectors report it in
//! [`DetectionStatus`](crate::DetectionStatus) and keep going.

use grainguard_core::SignalError;
use thiserror_no_std::Error;

/// Result type for detector construction and pipeline runs
pub type DetectResult<T> = Result<T, DetectError>;

/// Errors from building or running detectors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DetectError {
    /// Signal conditioning failed (bad filter config, unordered readings, ...)
    #[error("Signal error: {0}")]
    Signal(SignalError),

    /// Detector configuration cannot be used
    #[error("Invalid detector configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: &'static str,
    },
}

impl From<SignalError> for DetectError {
    fn from(error: SignalError) -> Self {
        Self::Signal(error)
    }
}

/// A derived metric whose denominator is zero
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricError {
    /// The metric cannot be computed from the tally
    #[error("Metric {metric} is undefined: zero denominator")]
    Undefined {
        /// Metric name
        metric: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for DetectError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Signal(e) => defmt::write!(fmt, "Signal: {}", e),
            Self::InvalidConfig { reason } => defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MetricError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Undefined { metric } => defmt::write!(fmt, "Undefined {}", metric),
        }
    }
}
