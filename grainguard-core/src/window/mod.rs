//! Windowed aggregation of cleaned readings
//!
//! ## Overview
//!
//! Detectors never look at single readings. They look at windows: contiguous,
//! non-overlapping slices of the cleaned sequence, delimited either by
//! wall-clock duration or by row count ([`WindowPolicy`]).
//!
//! A [`Window`] borrows its readings and precomputes one [`ChannelSummary`]
//! per channel (mean, first, last, net change, net rate). Per-sample series
//! (rates and successive differences) are derived on demand.
//!
//! ## Rates
//!
//! ```text
//! rate = (value[last] - value[first]) / ((ms[last] - ms[first]) / 1000)
//! ```
//!
//! Signed, in units per second. A window whose counter does not advance
//! between its first and last reading has no rate; the aggregator skips such
//! windows.
//!
//! ## Alignment
//!
//! Duration windows are slotted on the gateway wall clock
//! ([`Reading::timestamp`]); rates use the node counter
//! ([`Reading::timestamp_ms`]). A counter that drifts or restarts therefore
//! moves no reading into the wrong slot.

mod aggregator;
mod summary;

pub use aggregator::{Aggregation, WindowAggregator};
pub use summary::{ChannelOverview, RateSummary};

use alloc::vec::Vec;

use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::window::{DEFAULT_WINDOW_DURATION_MS, DEFAULT_WINDOW_ROWS},
    errors::{SignalError, SignalResult},
    reading::{Channel, Reading},
    stats,
    time::{self, Timestamp},
};

/// How readings are partitioned into windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WindowPolicy {
    /// `[t0 + k·d, t0 + (k+1)·d)` on the wall clock, `t0` the first
    /// reading's [`Reading::timestamp`]
    ///
    /// Readings must be non-decreasing in wall-clock time. A trailing partial
    /// period is emitted as a short window.
    Duration {
        /// Window length in milliseconds
        duration_ms: u64,
    },
    /// Runs of exactly `rows` readings; a trailing partial run is discarded
    ///
    /// Readings must be non-decreasing in `timestamp_ms`.
    Count {
        /// Readings per window
        rows: usize,
    },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::Duration { duration_ms: DEFAULT_WINDOW_DURATION_MS }
    }
}

impl WindowPolicy {
    /// Count policy with the default row count
    pub const fn default_count() -> Self {
        Self::Count { rows: DEFAULT_WINDOW_ROWS }
    }

    /// Check that the policy can produce windows
    pub fn validate(&self) -> SignalResult<()> {
        match *self {
            Self::Duration { duration_ms: 0 } => {
                Err(SignalError::InvalidConfig { reason: "window duration must be positive" })
            }
            Self::Count { rows: 0 } => {
                Err(SignalError::InvalidConfig { reason: "window must hold at least 1 row" })
            }
            _ => Ok(()),
        }
    }
}

/// Summary of one channel over one window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSummary {
    /// Mean of the finite values, `None` if there are none
    pub mean: Option<f64>,
    /// Value of the first reading
    pub first: f64,
    /// Value of the last reading
    pub last: f64,
    /// `last - first`
    pub net_change: f64,
    /// Net change per second over the window span, `None` for a zero span
    pub rate: Option<f64>,
}

impl ChannelSummary {
    fn compute(readings: &[Reading], channel: Channel) -> Option<Self> {
        let (first, last) = (readings.first()?, readings.last()?);
        let values: Vec<f64> = readings.iter().map(|r| r.value(channel)).collect();
        let net_change = last.value(channel) - first.value(channel);

        Some(Self {
            mean: stats::mean(&values),
            first: first.value(channel),
            last: last.value(channel),
            net_change,
            rate: time::rate_per_second(net_change, first.timestamp_ms, last.timestamp_ms),
        })
    }
}

/// A contiguous, non-empty slice of readings
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Slot number: period index for duration windows, chunk index for count
    /// windows. Skipped slots leave gaps.
    pub index: usize,
    /// Nominal wall-clock start of the slot (first reading for count windows)
    pub slot_start: NaiveDateTime,
    readings: &'a [Reading],
    summaries: [ChannelSummary; 3],
}

impl<'a> Window<'a> {
    /// Build a window over `readings`
    ///
    /// Fails for an empty slice. A zero time span is allowed here; net rates
    /// are then `None`.
    pub fn new(index: usize, readings: &'a [Reading]) -> SignalResult<Self> {
        let insufficient = SignalError::InsufficientData { required: 1, available: 0 };
        let first = readings.first().ok_or(insufficient)?;
        let summary = |channel| ChannelSummary::compute(readings, channel).ok_or(insufficient);

        Ok(Self {
            index,
            slot_start: first.timestamp,
            readings,
            summaries: [
                summary(Channel::Co2)?,
                summary(Channel::Temperature)?,
                summary(Channel::Humidity)?,
            ],
        })
    }

    fn with_slot_start(mut self, slot_start: NaiveDateTime) -> Self {
        self.slot_start = slot_start;
        self
    }

    /// Readings in the window, in order
    pub fn readings(&self) -> &'a [Reading] {
        self.readings
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    fn first(&self) -> &Reading {
        // Non-empty by construction
        &self.readings[0]
    }

    fn last(&self) -> &Reading {
        &self.readings[self.readings.len() - 1]
    }

    /// Wall-clock time of the first reading
    pub fn start(&self) -> NaiveDateTime {
        self.first().timestamp
    }

    /// Wall-clock time of the last reading
    pub fn end(&self) -> NaiveDateTime {
        self.last().timestamp
    }

    /// Millisecond counter of the first reading
    pub fn start_ms(&self) -> Timestamp {
        self.first().timestamp_ms
    }

    /// Millisecond counter of the last reading
    pub fn end_ms(&self) -> Timestamp {
        self.last().timestamp_ms
    }

    /// Time between first and last reading, `None` for a zero span
    pub fn span_seconds(&self) -> Option<f64> {
        time::span_seconds(self.start_ms(), self.end_ms())
    }

    /// Whether the counter does not advance between first and last reading
    pub fn is_degenerate(&self) -> bool {
        self.span_seconds().is_none()
    }

    /// Summary of one channel
    pub fn summary(&self, channel: Channel) -> &ChannelSummary {
        &self.summaries[channel as usize]
    }

    /// Mean of one channel
    pub fn mean(&self, channel: Channel) -> Option<f64> {
        self.summary(channel).mean
    }

    /// Net rate of change of one channel per second
    pub fn rate(&self, channel: Channel) -> Option<f64> {
        self.summary(channel).rate
    }

    /// Per-sample rates `Δvalue / (Δms / 1000)` between consecutive readings
    ///
    /// Pairs with a zero time delta or a missing value are skipped.
    pub fn sample_rates(&self, channel: Channel) -> Vec<f64> {
        self.readings
            .windows(2)
            .filter_map(|pair| {
                let delta = pair[1].value(channel) - pair[0].value(channel);
                if !delta.is_finite() {
                    return None;
                }
                time::rate_per_second(delta, pair[0].timestamp_ms, pair[1].timestamp_ms)
            })
            .collect()
    }

    /// Successive differences `value[i] - value[i-1]`, missing values skipped
    pub fn successive_differences(&self, channel: Channel) -> Vec<f64> {
        self.readings
            .windows(2)
            .map(|pair| pair[1].value(channel) - pair[0].value(channel))
            .filter(|d| d.is_finite())
            .collect()
    }

    /// The leading part of this window covering `[start, start + duration_ms)`
    /// on the wall clock
    pub fn head(&self, duration_ms: u64) -> Window<'a> {
        let count = match time::add_wall_clock_ms(self.start(), duration_ms) {
            Some(cutoff) => self.readings.partition_point(|r| r.timestamp < cutoff).max(1),
            None => self.readings.len(),
        };
        // `count >= 1` on a non-empty slice, so construction cannot fail
        match Window::new(self.index, &self.readings[..count]) {
            Ok(head) => head.with_slot_start(self.slot_start),
            Err(_) => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(points: &[(u64, f64)]) -> Vec<Reading> {
        points
            .iter()
            .map(|&(ms, co2)| Reading::from_millis(ms, co2, 20.0, 50.0).unwrap())
            .collect()
    }

    #[test]
    fn summary_and_signed_rate() {
        let data = readings(&[(0, 500.0), (10_000, 505.0), (20_000, 480.0)]);
        let window = Window::new(0, &data).unwrap();

        let co2 = window.summary(Channel::Co2);
        assert_eq!(co2.first, 500.0);
        assert_eq!(co2.last, 480.0);
        assert_eq!(co2.net_change, -20.0);
        assert_eq!(co2.rate, Some(-1.0));
        assert!((co2.mean.unwrap() - 495.0).abs() < 1e-12);
        assert_eq!(window.span_seconds(), Some(20.0));
    }

    #[test]
    fn sample_rates_skip_zero_time_deltas() {
        let data = readings(&[(0, 500.0), (1_000, 502.0), (1_000, 510.0), (3_000, 506.0)]);
        let window = Window::new(0, &data).unwrap();
        assert_eq!(window.sample_rates(Channel::Co2), vec![2.0, -2.0]);
        assert_eq!(window.successive_differences(Channel::Co2), vec![2.0, 8.0, -4.0]);
    }

    #[test]
    fn zero_span_window_has_no_rate() {
        let data = readings(&[(5_000, 500.0), (5_000, 501.0)]);
        let window = Window::new(3, &data).unwrap();
        assert!(window.is_degenerate());
        assert_eq!(window.rate(Channel::Co2), None);
    }

    #[test]
    fn empty_window_rejected() {
        assert!(matches!(
            Window::new(0, &[]),
            Err(SignalError::InsufficientData { required: 1, available: 0 })
        ));
    }

    #[test]
    fn head_restricts_to_duration() {
        let data = readings(&[(0, 1.0), (60_000, 2.0), (120_000, 3.0), (180_000, 4.0)]);
        let window = Window::new(0, &data).unwrap();
        let head = window.head(120_000);
        assert_eq!(head.len(), 2);
        assert_eq!(head.end_ms(), 60_000);
    }

    #[test]
    fn head_uses_wall_clock() {
        // Counter restarts after the second reading
        let data: Vec<Reading> = [(0, 900_000), (60_000, 960_000), (120_000, 0), (180_000, 60_000)]
            .iter()
            .map(|&(wall, counter)| Reading {
                timestamp_ms: counter,
                ..Reading::from_millis(wall, 450.0, 20.0, 50.0).unwrap()
            })
            .collect();
        let window = Window::new(0, &data).unwrap();
        assert_eq!(window.head(120_000).len(), 2);
        assert_eq!(window.head(u64::MAX).len(), 4);
    }

    #[test]
    fn policy_validation() {
        assert!(WindowPolicy::default().validate().is_ok());
        assert!(WindowPolicy::default_count().validate().is_ok());
        assert!(WindowPolicy::Count { rows: 0 }.validate().is_err());
        assert!(WindowPolicy::Duration { duration_ms: 0 }.validate().is_err());
    }
}
