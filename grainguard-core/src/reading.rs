//! Sensor readings and channels
//!
//! A [`Reading`] is one row from the chamber node: a wall-clock timestamp, the
//! node's millisecond counter and the three measured channels. Readings are
//! immutable; cleaning produces new readings with the same timestamps.

use chrono::{DateTime, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{SignalError, SignalResult};
use crate::time::Timestamp;

/// Measured channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Channel {
    /// CO2 concentration
    Co2 = 0,
    /// Air temperature
    Temperature = 1,
    /// Relative humidity
    Humidity = 2,
}

impl Channel {
    /// All channels in column order
    pub const ALL: [Channel; 3] = [Channel::Co2, Channel::Temperature, Channel::Humidity];

    /// Column name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Co2 => "co2",
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
        }
    }

    /// Unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::Co2 => "ppm",
            Channel::Temperature => "°C",
            Channel::Humidity => "%",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One timestamped row of sensor data
///
/// Missing values are carried as `NaN`; the batch filter leaves them alone and
/// the statistics skip them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Wall-clock time assigned by the gateway
    pub timestamp: NaiveDateTime,
    /// Millisecond counter used for rate calculations
    pub timestamp_ms: Timestamp,
    /// CO2 concentration in ppm
    pub co2: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
}

impl Reading {
    /// Create a reading with an explicit wall-clock timestamp
    pub fn new(
        timestamp: NaiveDateTime,
        timestamp_ms: Timestamp,
        co2: f64,
        temperature: f64,
        humidity: f64,
    ) -> Self {
        Self { timestamp, timestamp_ms, co2, temperature, humidity }
    }

    /// Create a reading whose wall-clock time is derived from `timestamp_ms`
    /// interpreted as milliseconds since the Unix epoch (UTC)
    pub fn from_millis(
        timestamp_ms: Timestamp,
        co2: f64,
        temperature: f64,
        humidity: f64,
    ) -> SignalResult<Self> {
        let millis = i64::try_from(timestamp_ms)
            .map_err(|_| SignalError::InvalidValue { field: "timestamp_ms" })?;
        let timestamp = DateTime::from_timestamp_millis(millis)
            .ok_or(SignalError::InvalidValue { field: "timestamp_ms" })?
            .naive_utc();
        Ok(Self::new(timestamp, timestamp_ms, co2, temperature, humidity))
    }

    /// Value of one channel
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Co2 => self.co2,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }

    /// Copy of this reading with one channel replaced
    pub fn with_value(mut self, channel: Channel, value: f64) -> Self {
        match channel {
            Channel::Co2 => self.co2 = value,
            Channel::Temperature => self.temperature = value,
            Channel::Humidity => self.humidity = value,
        }
        self
    }

    /// The three channel values as a sample
    pub fn sample(&self) -> RawSample {
        RawSample::new(self.co2, self.temperature, self.humidity)
    }
}

/// One `(co2, temperature, humidity)` triple as it arrives from the sensor
///
/// Used for both raw input and cleaned output of the streaming filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawSample {
    /// Optional node counter when the line carried one
    pub timestamp_ms: Option<Timestamp>,
    /// CO2 concentration in ppm
    pub co2: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
}

impl RawSample {
    /// Sample without a node timestamp
    pub const fn new(co2: f64, temperature: f64, humidity: f64) -> Self {
        Self { timestamp_ms: None, co2, temperature, humidity }
    }

    /// Attach the node timestamp
    pub const fn at(mut self, timestamp_ms: Timestamp) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Value of one channel
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Co2 => self.co2,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }
}

/// Cleaned output of the streaming filter
pub type CleanSample = RawSample;
