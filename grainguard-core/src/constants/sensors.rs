//! Sensor Specifications and Limits
//!
//! Plausible ranges used to reject malformed readings before they reach the
//! filters. A value outside these ranges is not an outlier to be smoothed, it
//! is a broken reading to be dropped.

// ===== CO2 SENSOR SPECIFICATIONS =====

/// Minimum reportable CO2 concentration (ppm).
///
/// NDIR sensors never report negative concentrations; zero shows up during
/// self-calibration.
pub const CO2_SENSOR_MIN_PPM: f64 = 0.0;

/// Maximum reportable CO2 concentration (ppm).
///
/// Source: Sensirion SCD30 / SCD41 datasheets (0-40 000 ppm range)
pub const CO2_SENSOR_MAX_PPM: f64 = 40_000.0;

// ===== TEMPERATURE SENSOR SPECIFICATIONS =====

/// Minimum operating temperature (°C).
///
/// Source: Sensirion SHT3x datasheet
pub const TEMP_SENSOR_MIN_C: f64 = -40.0;

/// Maximum operating temperature (°C).
///
/// Source: Sensirion SHT3x datasheet
pub const TEMP_SENSOR_MAX_C: f64 = 125.0;

// ===== HUMIDITY SENSOR SPECIFICATIONS =====

/// Minimum relative humidity accepted (%).
///
/// Capacitive sensors drift slightly negative when very dry.
pub const HUMIDITY_SENSOR_MIN_PCT: f64 = -2.0;

/// Maximum relative humidity accepted (%).
///
/// Slightly above 100% to tolerate condensation artefacts.
pub const HUMIDITY_SENSOR_MAX_PCT: f64 = 102.0;
