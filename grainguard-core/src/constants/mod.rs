//! Constants for GrainGuard Core
//!
//! Every default used by the filters, the aggregator and the plausibility
//! checks is defined here with its unit, so that configuration structs never
//! carry magic numbers.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Filter**: Hampel window, MAD multiplier, percentile clip bounds
//! - **Window**: aggregation window duration and row count
//! - **Sensors**: plausible ranges for CO2, temperature and humidity sensors
//! - **Time**: unit conversions
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the constant name
//! 3. Reference the datasheet or experiment a value comes from

/// Hampel filter and percentile clipping defaults.
pub mod filter;

/// Sensor specifications and plausible reading ranges.
pub mod sensors;

/// Time unit conversions.
pub mod time;

/// Aggregation window defaults.
pub mod window;

// Re-export commonly used constants for convenience
pub use filter::{
    DEFAULT_HAMPEL_WINDOW, DEFAULT_N_SIGMAS, DEFAULT_CLIP_LOWER_PCT, DEFAULT_CLIP_UPPER_PCT,
    MAX_STREAMING_WINDOW,
};

pub use sensors::{
    CO2_SENSOR_MIN_PPM, CO2_SENSOR_MAX_PPM,
    TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C,
    HUMIDITY_SENSOR_MIN_PCT, HUMIDITY_SENSOR_MAX_PCT,
};

pub use time::{MS_PER_SECOND, MS_PER_MINUTE};

pub use window::{DEFAULT_WINDOW_DURATION_MS, DEFAULT_WINDOW_ROWS, MIN_SAMPLES_FOR_RATE};
