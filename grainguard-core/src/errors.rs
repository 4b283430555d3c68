//! Error Types for Signal Conditioning Failures
//!
//! ## Design Philosophy
//!
//! The signal pipeline runs on gateways that may stay up for weeks, fed by a
//! serial line that occasionally produces garbage. Errors are therefore:
//!
//! 1. **Small and Copy**: every variant carries inline data only (`&'static str`
//!    reasons, no `String`), so errors can be returned from hot paths and
//!    stored in diagnostics without allocation.
//!
//! 2. **Never fatal by themselves**: every error describes one reading, one
//!    window or one statistic. The caller decides whether to drop it, log it or
//!    stop.
//!
//! ## Error Categories
//!
//! ### Insufficient data
//! - `InsufficientData`: a statistic needs more samples than available
//!   (rolling window, rate of change, MAD)
//!
//! ### Degenerate windows
//! - `DegenerateWindow`: a window spans zero time, so no rate can be computed
//!
//! ### Malformed readings
//! - `InvalidValue`: NaN or infinity in a raw field
//! - `OutOfRange`: a field outside the plausible sensor range
//! - `MalformedLine`: a sensor line that does not parse
//!
//! ### Caller mistakes
//! - `UnorderedTimestamps`: readings handed to the aggregator out of order
//! - `InvalidConfig`: a configuration value that cannot work
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use grainguard_core::{SignalError, StreamingCleaner, RawSample};
//!
//! let mut cleaner: StreamingCleaner = StreamingCleaner::default();
//! let raw = RawSample::new(412.0, f64::NAN, 55.0);
//!
//! match cleaner.process(raw) {
//!     Ok(clean) => { /* forward to the aggregator */ let _ = clean; }
//!     Err(SignalError::InvalidValue { field }) => {
//!         // One bad reading: drop it and keep streaming
//!         assert_eq!(field, "temperature");
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for signal conditioning operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal conditioning errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SignalError {
    /// Not enough samples for the requested statistic
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of samples needed
        required: usize,
        /// Actual number of samples available
        available: usize,
    },

    /// Window with zero time span - no rate of change can be derived
    #[error("Degenerate window: zero time span at {start_ms}..{end_ms} ms")]
    DegenerateWindow {
        /// First timestamp of the window
        start_ms: u64,
        /// Last timestamp of the window
        end_ms: u64,
    },

    /// Value is NaN or infinite
    #[error("Invalid value in field {field}: not a finite number")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
    },

    /// Value outside the plausible range for its sensor
    #[error("Field {field} value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// The raw reading that failed the check
        value: f64,
        /// Lowest plausible value
        min: f64,
        /// Highest plausible value
        max: f64,
    },

    /// Sensor line could not be parsed
    #[error("Malformed line: {reason}")]
    MalformedLine {
        /// What was wrong with the line
        reason: &'static str,
    },

    /// Readings are out of order on the key the window policy uses
    #[error("Reading {index} is earlier than its predecessor")]
    UnorderedTimestamps {
        /// Index of the first out-of-order reading
        index: usize,
    },

    /// Configuration cannot be used
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: &'static str,
    },
}

impl SignalError {
    /// Whether this error concerns a single reading that can simply be dropped
    pub fn is_reading_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidValue { .. } | Self::OutOfRange { .. } | Self::MalformedLine { .. }
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SignalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InsufficientData { required, available } =>
                defmt::write!(fmt, "Need {} samples, have {}", required, available),
            Self::DegenerateWindow { start_ms, end_ms } =>
                defmt::write!(fmt, "Zero-span window {}..{}", start_ms, end_ms),
            Self::InvalidValue { field } =>
                defmt::write!(fmt, "Invalid {}", field),
            Self::OutOfRange { field, value, min, max } =>
                defmt::write!(fmt, "{} {} outside [{}, {}]", field, value, min, max),
            Self::MalformedLine { reason } =>
                defmt::write!(fmt, "Malformed line: {}", reason),
            Self::UnorderedTimestamps { index } =>
                defmt::write!(fmt, "Unordered reading at {}", index),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_errors_are_droppable() {
        assert!(SignalError::InvalidValue { field: "co2" }.is_reading_error());
        assert!(SignalError::MalformedLine { reason: "x" }.is_reading_error());
        assert!(!SignalError::DegenerateWindow { start_ms: 5, end_ms: 5 }.is_reading_error());
    }

    #[test]
    fn error_display() {
        let err = SignalError::InsufficientData { required: 2, available: 1 };
        assert_eq!(format!("{}", err), "Insufficient data: need 2, have 1");
    }
}
