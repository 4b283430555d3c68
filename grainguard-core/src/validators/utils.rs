//! Common validation checks shared by all channels
//!
//! Pure functions: no state, no allocation, errors instead of panics.

use crate::errors::{SignalError, SignalResult};

/// Reject NaN and infinity
pub fn check_finite(field: &'static str, value: f64) -> SignalResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SignalError::InvalidValue { field })
    }
}

/// Check if a value is within the inclusive range `[min, max]`
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> SignalResult<()> {
    if value < min || value > max {
        Err(SignalError::OutOfRange { field, value, min, max })
    } else {
        Ok(())
    }
}
