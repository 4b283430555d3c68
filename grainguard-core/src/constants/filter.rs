//! Hampel Filter Defaults
//!
//! Values tuned on the stored-grain chamber recordings (CO2 via NDIR sensor,
//! temperature/humidity via SHT3x) sampled roughly once per second.

/// Number of points in the Hampel rolling window.
///
/// Centered in batch mode (five points before, four after), trailing in
/// streaming mode. Ten samples is short enough to follow genuine CO2 ramps
/// and long enough to outvote a single glitch.
pub const DEFAULT_HAMPEL_WINDOW: usize = 10;

/// Outlier threshold as a multiple of the median absolute deviation.
///
/// Applied to the raw MAD, without the 1.4826 normal-consistency factor.
/// The detection thresholds downstream were tuned against this convention.
pub const DEFAULT_N_SIGMAS: f64 = 3.0;

/// Lower percentile for post-filter clipping (percent, 0-100).
pub const DEFAULT_CLIP_LOWER_PCT: f64 = 0.5;

/// Upper percentile for post-filter clipping (percent, 0-100).
pub const DEFAULT_CLIP_UPPER_PCT: f64 = 99.5;

/// Storage capacity of a streaming channel buffer.
///
/// The configured window must not exceed this. Keeps the buffer a plain
/// array so the streaming path never allocates.
pub const MAX_STREAMING_WINDOW: usize = 32;
