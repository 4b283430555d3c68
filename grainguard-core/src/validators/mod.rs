//! Plausibility Checks for Raw Readings
//!
//! ## Overview
//!
//! The Hampel filters smooth glitches that are *plausible but wrong*: a CO2
//! sample 300 ppm above its neighbours. They cannot cope with values that are
//! not measurements at all: `NaN` from a failed I²C read, `-999` sentinel
//! values, 65535 from an overflowing register. Those must be rejected before
//! they enter a channel buffer, otherwise they poison the trailing median for
//! the next `W` readings.
//!
//! ## Validation Layers
//!
//! 1. **Finite check**: NaN and infinity are rejected
//! 2. **Range check**: each channel against its sensor's operating range
//!
//! A rejected reading affects only itself; processing continues with the next
//! one.
//!
//! ## Customization
//!
//! ```rust
//! use grainguard_core::validators::{ChannelLimits, ReadingValidator};
//! use grainguard_core::RawSample;
//!
//! // Heated chamber: no sub-zero temperatures expected
//! let validator = ReadingValidator::default()
//!     .with_temperature(ChannelLimits::new(0.0, 60.0));
//!
//! assert!(validator.check(&RawSample::new(450.0, 24.0, 60.0)).is_ok());
//! assert!(validator.check(&RawSample::new(450.0, -5.0, 60.0)).is_err());
//! ```

mod utils;

pub use utils::{check_finite, check_range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::sensors::{
        CO2_SENSOR_MAX_PPM, CO2_SENSOR_MIN_PPM, HUMIDITY_SENSOR_MAX_PCT, HUMIDITY_SENSOR_MIN_PCT,
        TEMP_SENSOR_MAX_C, TEMP_SENSOR_MIN_C,
    },
    errors::SignalResult,
    reading::{Channel, RawSample},
};

/// Inclusive plausible range for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelLimits {
    /// Lowest plausible value
    pub min: f64,
    /// Highest plausible value
    pub max: f64,
}

impl ChannelLimits {
    /// Create limits, swapping the bounds if given in the wrong order
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self { min, max }
    }

    /// Sensor operating range for a channel
    pub const fn sensor_range(channel: Channel) -> Self {
        match channel {
            Channel::Co2 => Self { min: CO2_SENSOR_MIN_PPM, max: CO2_SENSOR_MAX_PPM },
            Channel::Temperature => Self { min: TEMP_SENSOR_MIN_C, max: TEMP_SENSOR_MAX_C },
            Channel::Humidity => Self { min: HUMIDITY_SENSOR_MIN_PCT, max: HUMIDITY_SENSOR_MAX_PCT },
        }
    }
}

/// Rejects malformed raw samples before filtering
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReadingValidator {
    co2: ChannelLimits,
    temperature: ChannelLimits,
    humidity: ChannelLimits,
}

impl Default for ReadingValidator {
    fn default() -> Self {
        Self {
            co2: ChannelLimits::sensor_range(Channel::Co2),
            temperature: ChannelLimits::sensor_range(Channel::Temperature),
            humidity: ChannelLimits::sensor_range(Channel::Humidity),
        }
    }
}

impl ReadingValidator {
    /// Replace the CO2 limits
    pub fn with_co2(mut self, limits: ChannelLimits) -> Self {
        self.co2 = limits;
        self
    }

    /// Replace the temperature limits
    pub fn with_temperature(mut self, limits: ChannelLimits) -> Self {
        self.temperature = limits;
        self
    }

    /// Replace the humidity limits
    pub fn with_humidity(mut self, limits: ChannelLimits) -> Self {
        self.humidity = limits;
        self
    }

    /// Limits for a channel
    pub fn limits(&self, channel: Channel) -> ChannelLimits {
        match channel {
            Channel::Co2 => self.co2,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }

    /// Check one value of one channel
    pub fn check_value(&self, channel: Channel, value: f64) -> SignalResult<()> {
        check_finite(channel.name(), value)?;
        let limits = self.limits(channel);
        check_range(channel.name(), value, limits.min, limits.max)
    }

    /// Check every channel of a sample; the first failure is reported
    pub fn check(&self, sample: &RawSample) -> SignalResult<()> {
        for channel in Channel::ALL {
            self.check_value(channel, sample.value(channel))?;
        }
        Ok(())
    }
}
