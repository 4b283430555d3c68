//! Time helpers for millisecond timestamps
//!
//! Sensor nodes stamp each sample with a millisecond counter; the gateway
//! adds a wall-clock time. Rates are derived from the millisecond counter.
//! Duration windows are aligned on the wall clock, which survives a node
//! restart that resets the counter.

use chrono::{Duration, NaiveDateTime};

use crate::constants::time::MS_PER_SECOND;

/// Timestamp in milliseconds (device counter or epoch)
pub type Timestamp = u64;

/// Elapsed time between two timestamps in seconds
///
/// Returns `None` when `later` is not after `earlier`; a zero or negative span
/// has no meaningful rate.
pub fn span_seconds(earlier: Timestamp, later: Timestamp) -> Option<f64> {
    if later <= earlier {
        return None;
    }
    Some((later - earlier) as f64 / MS_PER_SECOND as f64)
}

/// Signed rate of change per second
///
/// `None` for a zero time delta instead of a division by zero.
pub fn rate_per_second(value_delta: f64, earlier: Timestamp, later: Timestamp) -> Option<f64> {
    span_seconds(earlier, later).map(|seconds| value_delta / seconds)
}

/// Wall-clock milliseconds from `origin` to `at`, `None` when `at` is earlier
pub fn wall_clock_offset_ms(origin: NaiveDateTime, at: NaiveDateTime) -> Option<u64> {
    u64::try_from((at - origin).num_milliseconds()).ok()
}

/// `at` moved forward by `ms`, `None` past the representable range
pub fn add_wall_clock_ms(at: NaiveDateTime, ms: u64) -> Option<NaiveDateTime> {
    let ms = i64::try_from(ms).ok()?;
    at.checked_add_signed(Duration::milliseconds(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 18).unwrap().and_hms_opt(hour, min, sec).unwrap()
    }

    #[test]
    fn wall_clock_offsets() {
        assert_eq!(wall_clock_offset_ms(at(10, 0, 0), at(10, 30, 1)), Some(1_801_000));
        assert_eq!(wall_clock_offset_ms(at(10, 0, 0), at(9, 59, 59)), None);
        assert_eq!(add_wall_clock_ms(at(10, 0, 0), 90_000), Some(at(10, 1, 30)));
        assert_eq!(add_wall_clock_ms(at(10, 0, 0), u64::MAX), None);
    }

    #[test]
    fn rate_calculation() {
        // 10 units in 500ms = 20 units/second
        assert_eq!(rate_per_second(10.0, 1000, 1500), Some(20.0));

        // Falling values give a negative rate
        assert_eq!(rate_per_second(-4.0, 0, 2000), Some(-2.0));

        // Zero time delta
        assert_eq!(rate_per_second(10.0, 700, 700), None);
    }

    #[test]
    fn backwards_span_is_undefined() {
        assert_eq!(span_seconds(2000, 1000), None);
        assert_eq!(span_seconds(1000, 4000), Some(3.0));
    }
}
