//! Sensor line parsing
//!
//! The chamber node prints one line per sample over serial, in one of two
//! layouts depending on firmware:
//!
//! ```text
//! 412,23.41,71.2              co2,temperature,humidity
//! 183020,412,23.41,71.2       timestamp_ms,co2,temperature,humidity
//! ```
//!
//! Parsing never panics: a line that does not match either layout yields a
//! [`SignalError::MalformedLine`] and the caller moves on to the next line.

use crate::errors::{SignalError, SignalResult};
use crate::reading::RawSample;

const MAX_FIELDS: usize = 4;

fn parse_value(field: &str, reason: &'static str) -> SignalResult<f64> {
    field.parse::<f64>().map_err(|_| SignalError::MalformedLine { reason })
}

/// Parse one sensor line into a raw sample
///
/// Whitespace around fields and a trailing `\r` are ignored. Range checks are
/// left to [`ReadingValidator`](crate::validators::ReadingValidator).
pub fn parse_sample_line(line: &str) -> SignalResult<RawSample> {
    let mut fields: heapless::Vec<&str, MAX_FIELDS> = heapless::Vec::new();
    for field in line.trim().split(',') {
        fields
            .push(field.trim())
            .map_err(|_| SignalError::MalformedLine { reason: "too many fields" })?;
    }

    match fields.as_slice() {
        [co2, temperature, humidity] => Ok(RawSample::new(
            parse_value(co2, "invalid co2")?,
            parse_value(temperature, "invalid temperature")?,
            parse_value(humidity, "invalid humidity")?,
        )),
        [timestamp_ms, co2, temperature, humidity] => {
            let timestamp_ms = timestamp_ms
                .parse::<u64>()
                .map_err(|_| SignalError::MalformedLine { reason: "invalid timestamp" })?;
            Ok(RawSample::new(
                parse_value(co2, "invalid co2")?,
                parse_value(temperature, "invalid temperature")?,
                parse_value(humidity, "invalid humidity")?,
            )
            .at(timestamp_ms))
        }
        _ => Err(SignalError::MalformedLine { reason: "expected 3 or 4 fields" }),
    }
}
