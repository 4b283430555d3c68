//! Causal Hampel filter for live sensor input
//!
//! Each channel owns a [`ChannelWindow`] with the last `w` **raw** values.
//! For every new value:
//!
//! 1. the raw value is recorded (evicting the oldest when full);
//! 2. while fewer than `w` values are held, the raw value is returned;
//! 3. otherwise median and MAD of the window (new value included) decide
//!    whether the value is passed through or replaced by the median.
//!
//! The window never stores substituted values, so one correction cannot bias
//! the next `w` decisions.
//!
//! ```rust
//! use grainguard_core::{Channel, StreamingHampel};
//!
//! let mut co2: StreamingHampel = StreamingHampel::new(Channel::Co2, 10, 3.0).unwrap();
//! for value in [400.0, 402.0, 400.0, 402.0, 400.0, 402.0, 400.0, 402.0, 400.0] {
//!     assert_eq!(co2.process(value).unwrap(), value); // warm-up
//! }
//! assert_eq!(co2.process(5000.0).unwrap(), 401.0);   // 10th reading: replaced
//! ```

use core::fmt;

use log::{trace, warn};

use super::HampelConfig;
use crate::{
    buffer::ChannelWindow,
    constants::filter::{DEFAULT_N_SIGMAS, MAX_STREAMING_WINDOW},
    errors::{SignalError, SignalResult},
    parse::parse_sample_line,
    reading::{Channel, CleanSample, RawSample},
    stats,
    traits::{OutlierFilter, ReadingSource},
    validators::ReadingValidator,
};

/// What the filter did with one value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOutcome {
    /// Window not yet full, raw value returned
    WarmingUp(f64),
    /// Value within the threshold, returned unchanged
    Passed(f64),
    /// Value outside the threshold, window median returned instead
    Replaced {
        /// The raw input
        raw: f64,
        /// The substituted median
        median: f64,
    },
}

impl FilterOutcome {
    /// Cleaned value to emit
    pub fn value(&self) -> f64 {
        match *self {
            Self::WarmingUp(v) | Self::Passed(v) => v,
            Self::Replaced { median, .. } => median,
        }
    }

    /// Whether the value was substituted
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Single-channel trailing-window Hampel filter
///
/// `N` is the buffer storage size; the configured window must fit in it.
#[derive(Debug, Clone)]
pub struct StreamingHampel<const N: usize = MAX_STREAMING_WINDOW> {
    channel: Channel,
    window: ChannelWindow<N>,
    n_sigmas: f64,
}

impl<const N: usize> StreamingHampel<N> {
    /// Create a filter for `channel` with a trailing window of `window_size`
    pub fn new(channel: Channel, window_size: usize, n_sigmas: f64) -> SignalResult<Self> {
        let config = HampelConfig::default()
            .with_window_size(window_size)
            .with_n_sigmas(n_sigmas);
        Self::from_config(channel, &config)
    }

    /// Create a filter from a shared configuration (clipping is ignored)
    pub fn from_config(channel: Channel, config: &HampelConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(Self {
            channel,
            window: ChannelWindow::new(config.window_size)?,
            n_sigmas: config.n_sigmas,
        })
    }

    /// Filter with the default window and threshold
    ///
    /// `N` must be at least [`DEFAULT_HAMPEL_WINDOW`](crate::constants::filter::DEFAULT_HAMPEL_WINDOW);
    /// smaller storage fails to compile.
    pub fn with_defaults(channel: Channel) -> Self {
        Self {
            channel,
            window: ChannelWindow::with_default_capacity(),
            n_sigmas: DEFAULT_N_SIGMAS,
        }
    }

    /// Channel this filter cleans
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Raw history, oldest first
    pub fn history(&self) -> &ChannelWindow<N> {
        &self.window
    }

    /// Whether the warm-up period is over
    pub fn is_warm(&self) -> bool {
        self.window.is_full()
    }

    /// Record a raw value and decide what to emit
    ///
    /// Non-finite values are rejected without touching the history.
    pub fn process_detailed(&mut self, value: f64) -> SignalResult<FilterOutcome> {
        if !value.is_finite() {
            return Err(SignalError::InvalidValue { field: self.channel.name() });
        }

        self.window.push(value);
        if !self.window.is_full() {
            return Ok(FilterOutcome::WarmingUp(value));
        }

        let mut scratch = [0.0; N];
        let held = self.window.copy_to(&mut scratch);
        let Some((median, mad)) = stats::median_and_mad_in_place(held) else {
            return Ok(FilterOutcome::Passed(value));
        };

        let threshold = self.n_sigmas * mad;
        if libm::fabs(value - median) > threshold {
            trace!(
                "{}: {} replaced by median {} (mad {}, threshold {})",
                self.channel, value, median, mad, threshold
            );
            Ok(FilterOutcome::Replaced { raw: value, median })
        } else {
            Ok(FilterOutcome::Passed(value))
        }
    }

    /// Record a raw value and return the cleaned value
    pub fn process(&mut self, value: f64) -> SignalResult<f64> {
        self.process_detailed(value).map(|outcome| outcome.value())
    }

    /// Forget the history; the next `w - 1` values pass raw again
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl<const N: usize> OutlierFilter<f64> for StreamingHampel<N> {
    type Output = SignalResult<f64>;

    fn clean(&mut self, input: f64) -> Self::Output {
        self.process(input)
    }
}

/// Counters kept by a [`StreamingCleaner`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanerStats {
    /// Samples accepted and filtered
    pub processed: u64,
    /// Samples rejected as malformed
    pub rejected: u64,
    /// Substitutions per channel, indexed by `Channel as usize`
    pub replaced: [u64; 3],
}

/// Errors from driving the cleaner with a [`ReadingSource`]
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// The source failed to deliver a sample
    Transport(E),
    /// The sample was delivered but rejected
    Rejected(SignalError),
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Rejected(e) => write!(f, "Rejected sample: {}", e),
        }
    }
}

/// Three-channel streaming cleaner: validation plus one Hampel filter per channel
///
/// Owns its three channel buffers exclusively. Each call processes one
/// sample to completion, so stopping between calls never leaves partial
/// state behind.
#[derive(Debug, Clone)]
pub struct StreamingCleaner<const N: usize = MAX_STREAMING_WINDOW> {
    co2: StreamingHampel<N>,
    temperature: StreamingHampel<N>,
    humidity: StreamingHampel<N>,
    validator: ReadingValidator,
    stats: CleanerStats,
}

impl<const N: usize> Default for StreamingCleaner<N> {
    fn default() -> Self {
        Self {
            co2: StreamingHampel::with_defaults(Channel::Co2),
            temperature: StreamingHampel::with_defaults(Channel::Temperature),
            humidity: StreamingHampel::with_defaults(Channel::Humidity),
            validator: ReadingValidator::default(),
            stats: CleanerStats::default(),
        }
    }
}

impl<const N: usize> StreamingCleaner<N> {
    /// Create a cleaner with the same Hampel settings on every channel
    pub fn new(config: &HampelConfig) -> SignalResult<Self> {
        Ok(Self {
            co2: StreamingHampel::from_config(Channel::Co2, config)?,
            temperature: StreamingHampel::from_config(Channel::Temperature, config)?,
            humidity: StreamingHampel::from_config(Channel::Humidity, config)?,
            validator: ReadingValidator::default(),
            stats: CleanerStats::default(),
        })
    }

    /// Replace the plausibility checks
    pub fn with_validator(mut self, validator: ReadingValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Running counters
    pub fn stats(&self) -> CleanerStats {
        self.stats
    }

    /// Filter for one channel
    pub fn channel(&self, channel: Channel) -> &StreamingHampel<N> {
        match channel {
            Channel::Co2 => &self.co2,
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
        }
    }

    /// Clean one raw sample
    ///
    /// A malformed sample is rejected as a whole before any buffer changes;
    /// the next call proceeds normally.
    pub fn process(&mut self, raw: RawSample) -> SignalResult<CleanSample> {
        if let Err(e) = self.validator.check(&raw) {
            self.stats.rejected += 1;
            warn!("rejected sample {:?}: {}", raw, e);
            return Err(e);
        }

        let co2 = self.co2.process_detailed(raw.co2)?;
        let temperature = self.temperature.process_detailed(raw.temperature)?;
        let humidity = self.humidity.process_detailed(raw.humidity)?;

        for (channel, outcome) in [
            (Channel::Co2, co2),
            (Channel::Temperature, temperature),
            (Channel::Humidity, humidity),
        ] {
            if outcome.is_replaced() {
                self.stats.replaced[channel as usize] += 1;
            }
        }
        self.stats.processed += 1;

        Ok(CleanSample {
            timestamp_ms: raw.timestamp_ms,
            co2: co2.value(),
            temperature: temperature.value(),
            humidity: humidity.value(),
        })
    }

    /// Parse and clean one sensor line
    pub fn process_line(&mut self, line: &str) -> SignalResult<CleanSample> {
        match parse_sample_line(line) {
            Ok(raw) => self.process(raw),
            Err(e) => {
                self.stats.rejected += 1;
                warn!("rejected line {:?}: {}", line, e);
                Err(e)
            }
        }
    }

    /// Pull one sample from `source` and clean it
    ///
    /// `WouldBlock` from the source is passed through untouched; it is the
    /// only point where the caller waits.
    pub fn poll<S: ReadingSource>(
        &mut self,
        source: &mut S,
    ) -> nb::Result<CleanSample, StreamError<S::Error>> {
        let raw = source
            .poll_sample()
            .map_err(|e| e.map(StreamError::Transport))?;
        self.process(raw)
            .map_err(|e| nb::Error::Other(StreamError::Rejected(e)))
    }

    /// Forget all channel histories
    pub fn reset(&mut self) {
        self.co2.reset();
        self.temperature.reset();
        self.humidity.reset();
    }
}

impl<const N: usize> OutlierFilter<RawSample> for StreamingCleaner<N> {
    type Output = SignalResult<CleanSample>;

    fn clean(&mut self, input: RawSample) -> Self::Output {
        self.process(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALTERNATING: [f64; 9] = [400.0, 402.0, 400.0, 402.0, 400.0, 402.0, 400.0, 402.0, 400.0];

    fn warmed_co2() -> StreamingHampel {
        let mut filter = StreamingHampel::new(Channel::Co2, 10, 3.0).unwrap();
        for v in ALTERNATING {
            assert_eq!(filter.process_detailed(v).unwrap(), FilterOutcome::WarmingUp(v));
        }
        filter
    }

    #[test]
    fn warm_up_returns_raw_values() {
        let mut filter = StreamingHampel::<16>::new(Channel::Co2, 10, 3.0).unwrap();
        // Even a wild value passes during warm-up
        for (i, v) in [400.0, 9000.0, 401.0].into_iter().enumerate() {
            assert_eq!(filter.process(v).unwrap(), v, "reading {}", i);
        }
        assert!(!filter.is_warm());
    }

    #[test]
    fn spike_on_tenth_reading_replaced() {
        let mut filter = warmed_co2();
        // Window: five 400s, four 402s, 5000 -> median 401, MAD 1
        let outcome = filter.process_detailed(5000.0).unwrap();
        assert_eq!(outcome, FilterOutcome::Replaced { raw: 5000.0, median: 401.0 });
        assert!(filter.is_warm());
    }

    #[test]
    fn history_keeps_raw_values() {
        let mut filter = warmed_co2();
        filter.process(5000.0).unwrap();
        assert_eq!(filter.history().last(), Some(5000.0));

        // Still within threshold of a window that contains the raw spike
        assert_eq!(filter.process(402.0).unwrap(), 402.0);
    }

    #[test]
    fn non_finite_rejected_without_recording() {
        let mut filter = warmed_co2();
        let before = filter.history().len();
        assert_eq!(
            filter.process(f64::NAN),
            Err(SignalError::InvalidValue { field: "co2" })
        );
        assert_eq!(filter.history().len(), before);
    }

    #[test]
    fn window_larger_than_storage_rejected() {
        let result = StreamingHampel::<8>::new(Channel::Humidity, 10, 3.0);
        assert!(matches!(result, Err(SignalError::InvalidConfig { .. })));
    }

    #[test]
    fn cleaner_rejects_one_sample_and_continues() {
        let mut cleaner: StreamingCleaner = StreamingCleaner::new(&HampelConfig::default()).unwrap();

        assert!(cleaner.process(RawSample::new(450.0, 22.0, 60.0)).is_ok());
        assert!(cleaner.process(RawSample::new(450.0, f64::NAN, 60.0)).is_err());
        assert!(cleaner.process_line("garbage").is_err());
        assert!(cleaner.process(RawSample::new(451.0, 22.1, 60.2)).is_ok());

        let stats = cleaner.stats();
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.rejected, 2);
        // The rejected sample never reached any buffer
        assert_eq!(cleaner.channel(Channel::Co2).history().len(), 2);
        assert_eq!(cleaner.channel(Channel::Humidity).history().len(), 2);
    }

    #[test]
    fn default_cleaner_uses_full_default_window() {
        let mut cleaner: StreamingCleaner<10> = StreamingCleaner::default();
        for (i, co2) in ALTERNATING.into_iter().enumerate() {
            cleaner.process(RawSample::new(co2, 22.0, 60.0).at(i as u64 * 1000)).unwrap();
        }
        assert_eq!(cleaner.channel(Channel::Co2).history().capacity(), 10);
        assert!(!cleaner.channel(Channel::Co2).is_warm());

        let clean = cleaner.process(RawSample::new(5000.0, 22.0, 60.0).at(9000)).unwrap();
        assert_eq!(clean.co2, 401.0);
    }

    #[test]
    fn cleaner_counts_replacements_per_channel() {
        let mut cleaner: StreamingCleaner = StreamingCleaner::default();
        for (i, co2) in ALTERNATING.into_iter().enumerate() {
            let humidity = if i % 2 == 0 { 60.0 } else { 61.0 };
            cleaner.process(RawSample::new(co2, 22.0, humidity).at(i as u64 * 1000)).unwrap();
        }

        let clean = cleaner.process(RawSample::new(5000.0, 22.0, 60.0).at(9000)).unwrap();
        assert_eq!(clean.co2, 401.0);
        assert_eq!(clean.temperature, 22.0);
        assert_eq!(clean.timestamp_ms, Some(9000));
        assert_eq!(cleaner.stats().replaced, [1, 0, 0]);
    }

    struct Scripted(Vec<nb::Result<RawSample, &'static str>>);

    impl ReadingSource for Scripted {
        type Error = &'static str;

        fn poll_sample(&mut self) -> nb::Result<RawSample, Self::Error> {
            if self.0.is_empty() {
                return Err(nb::Error::WouldBlock);
            }
            self.0.remove(0)
        }
    }

    #[test]
    fn poll_passes_would_block_through() {
        let mut cleaner: StreamingCleaner = StreamingCleaner::default();
        let mut source = Scripted(vec![
            Ok(RawSample::new(450.0, 22.0, 60.0)),
            Err(nb::Error::Other("serial timeout")),
            Ok(RawSample::new(-1.0, 22.0, 60.0)),
        ]);

        assert!(cleaner.poll(&mut source).is_ok());
        assert_eq!(
            cleaner.poll(&mut source),
            Err(nb::Error::Other(StreamError::Transport("serial timeout")))
        );
        assert!(matches!(
            cleaner.poll(&mut source),
            Err(nb::Error::Other(StreamError::Rejected(SignalError::OutOfRange { field: "co2", .. })))
        ));
        assert_eq!(cleaner.poll(&mut source), Err(nb::Error::WouldBlock));
    }
}
