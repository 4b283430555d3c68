//! Aggregation Window Defaults

use super::time::MS_PER_MINUTE;

/// Default duration of a wall-clock window (milliseconds).
///
/// Thirty minutes: long enough for insect respiration to lift the CO2 baseline,
/// short enough to flag a failing fan within the same shift.
pub const DEFAULT_WINDOW_DURATION_MS: u64 = 30 * MS_PER_MINUTE;

/// Default number of rows in a count-based window.
pub const DEFAULT_WINDOW_ROWS: usize = 30;

/// Minimum number of samples before any rate of change exists.
pub const MIN_SAMPLES_FOR_RATE: usize = 2;
