//! Partition a reading sequence into windows

use alloc::vec::Vec;

use log::debug;

use super::{ChannelOverview, RateSummary, Window, WindowPolicy};
use crate::{
    errors::{SignalError, SignalResult},
    reading::{Channel, Reading},
    time,
};

/// Result of aggregating one reading sequence
#[derive(Debug, Clone, Default)]
pub struct Aggregation<'a> {
    /// Emitted windows in chronological order
    pub windows: Vec<Window<'a>>,
    /// Windows skipped because they span zero time
    pub skipped_degenerate: usize,
    /// Trailing rows dropped by a count policy
    pub discarded_rows: usize,
}

impl<'a> Aggregation<'a> {
    /// Number of emitted windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no window was emitted
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Iterate over emitted windows
    pub fn iter(&self) -> core::slice::Iter<'_, Window<'a>> {
        self.windows.iter()
    }

    /// Net rate of every emitted window with a finite rate, in window order
    pub fn rates(&self, channel: Channel) -> Vec<f64> {
        self.windows
            .iter()
            .filter_map(|w| w.rate(channel))
            .filter(|rate| rate.is_finite())
            .collect()
    }

    /// Distribution of the window rates of one channel
    ///
    /// `None` when no window has a rate.
    pub fn rate_summary(&self, channel: Channel) -> Option<RateSummary> {
        RateSummary::from_rates(&self.rates(channel))
    }

    /// Average net change and average level of one channel across windows
    pub fn overview(&self, channel: Channel) -> ChannelOverview {
        ChannelOverview::from_windows(&self.windows, channel)
    }

    fn push(&mut self, window: Window<'a>) {
        if window.is_degenerate() {
            debug!(
                "window {}: zero time span at {} ms, skipped",
                window.index,
                window.start_ms()
            );
            self.skipped_degenerate += 1;
        } else {
            self.windows.push(window);
        }
    }
}

impl<'a> IntoIterator for Aggregation<'a> {
    type Item = Window<'a>;
    type IntoIter = alloc::vec::IntoIter<Window<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.into_iter()
    }
}

/// Splits cleaned readings into windows according to a [`WindowPolicy`]
///
/// ```rust
/// use grainguard_core::{Reading, window::{WindowAggregator, WindowPolicy}};
///
/// let readings: Vec<Reading> = (0..65)
///     .map(|i| Reading::from_millis(i * 60_000, 450.0, 21.0, 60.0).unwrap())
///     .collect();
///
/// let aggregator = WindowAggregator::new(WindowPolicy::Count { rows: 30 }).unwrap();
/// let aggregation = aggregator.aggregate(&readings).unwrap();
/// assert_eq!(aggregation.len(), 2);
/// assert_eq!(aggregation.discarded_rows, 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowAggregator {
    policy: WindowPolicy,
}

impl WindowAggregator {
    /// Create an aggregator, validating the policy
    pub fn new(policy: WindowPolicy) -> SignalResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Active policy
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Partition `readings`
    ///
    /// Duration windows need readings non-decreasing in wall-clock time,
    /// count windows need them non-decreasing in `timestamp_ms`.
    pub fn aggregate<'a>(&self, readings: &'a [Reading]) -> SignalResult<Aggregation<'a>> {
        let aggregation = match self.policy {
            WindowPolicy::Duration { duration_ms } => {
                check_ordering(readings, |r| r.timestamp)?;
                by_duration(readings, duration_ms)?
            }
            WindowPolicy::Count { rows } => {
                check_ordering(readings, |r| r.timestamp_ms)?;
                by_count(readings, rows)?
            }
        };

        debug!(
            "aggregated {} readings into {} windows ({} degenerate, {} rows discarded)",
            readings.len(),
            aggregation.windows.len(),
            aggregation.skipped_degenerate,
            aggregation.discarded_rows
        );
        Ok(aggregation)
    }
}

fn check_ordering<K: PartialOrd>(readings: &[Reading], key: impl Fn(&Reading) -> K) -> SignalResult<()> {
    match readings.windows(2).position(|pair| key(&pair[1]) < key(&pair[0])) {
        Some(position) => Err(SignalError::UnorderedTimestamps { index: position + 1 }),
        None => Ok(()),
    }
}

fn by_duration(readings: &[Reading], duration_ms: u64) -> SignalResult<Aggregation<'_>> {
    let mut aggregation = Aggregation::default();
    let Some(origin) = readings.first().map(|r| r.timestamp) else {
        return Ok(aggregation);
    };
    // Ordering is checked, so every offset is non-negative
    let slot_of =
        |reading: &Reading| time::wall_clock_offset_ms(origin, reading.timestamp).unwrap_or(0) / duration_ms;

    let mut start = 0;
    while start < readings.len() {
        let slot = slot_of(&readings[start]);
        let len = readings[start..].partition_point(|r| slot_of(r) == slot);
        let slot_start = time::add_wall_clock_ms(origin, slot * duration_ms)
            .unwrap_or(readings[start].timestamp);
        let window = Window::new(slot as usize, &readings[start..start + len])?
            .with_slot_start(slot_start);
        aggregation.push(window);
        start += len;
    }
    Ok(aggregation)
}

fn by_count(readings: &[Reading], rows: usize) -> SignalResult<Aggregation<'_>> {
    let mut aggregation = Aggregation::default();
    let chunks = readings.chunks_exact(rows);
    aggregation.discarded_rows = chunks.remainder().len();

    for (index, chunk) in chunks.enumerate() {
        aggregation.push(Window::new(index, chunk)?);
    }
    Ok(aggregation)
}
