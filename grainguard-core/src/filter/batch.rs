//! Batch Hampel filter with percentile clipping
//!
//! ## Algorithm
//!
//! For a series `x` of length `n` and window size `w`:
//!
//! 1. `MAD = median(|x - median(x)|)` over the whole series, missing values
//!    ignored, computed once.
//! 2. For each index `i`, the centered window spans
//!    `[i + off + 1 - w, i + off]` with `off = (w - 1) / 2`. For `w = 10`
//!    that is five points before `i` and four after.
//! 3. If `|x[i] - median(window)| > n_sigmas × MAD`, `x[i]` becomes the window
//!    median.
//! 4. The filtered series is clipped to its `[lower, upper]` percentiles.
//!
//! ```text
//! w = 10, i = 7:   0 1 [2 3 4 5 6 (7) 8 9 10 11] 12 13
//!                        five before ^  four after
//! ```
//!
//! Where the window does not fit (series edges) the [`BoundaryPolicy`]
//! decides. A window containing a missing value has no median, so the value
//! at `i` is kept.

use alloc::vec::Vec;

use log::debug;

use super::{BoundaryPolicy, HampelConfig, PercentileClip};
use crate::{
    errors::SignalResult,
    reading::{Channel, Reading},
    stats,
    traits::OutlierFilter,
};

/// Offline Hampel filter for complete, already recorded series
#[derive(Debug, Clone)]
pub struct BatchHampel {
    config: HampelConfig,
}

impl Default for BatchHampel {
    fn default() -> Self {
        Self { config: HampelConfig::default() }
    }
}

impl BatchHampel {
    /// Create a filter, validating the configuration
    pub fn new(config: HampelConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &HampelConfig {
        &self.config
    }

    /// Index range `[start, end]` of the rolling window centered on `index`
    ///
    /// `None` when the full window does not fit and the policy keeps raw
    /// values there.
    fn window_bounds(&self, index: usize, len: usize) -> Option<(usize, usize)> {
        let w = self.config.window_size;
        let offset = (w - 1) / 2;
        let end_exclusive = index + offset + 1;

        match self.config.boundary {
            BoundaryPolicy::KeepRaw => {
                if end_exclusive < w || end_exclusive > len {
                    return None;
                }
                Some((end_exclusive - w, end_exclusive - 1))
            }
            BoundaryPolicy::Shrink => {
                let start = end_exclusive.saturating_sub(w);
                let end = (end_exclusive - 1).min(len.checked_sub(1)?);
                Some((start, end))
            }
        }
    }

    /// Rolling median at `index`, `None` at an undefined position
    pub fn rolling_median(&self, series: &[f64], index: usize) -> Option<f64> {
        let mut scratch = Vec::with_capacity(self.config.window_size);
        self.rolling_median_with(series, index, &mut scratch)
    }

    fn rolling_median_with(&self, series: &[f64], index: usize, scratch: &mut Vec<f64>) -> Option<f64> {
        let (start, end) = self.window_bounds(index, series.len())?;
        let window = &series[start..=end];
        if window.iter().any(|v| !v.is_finite()) {
            return None;
        }
        scratch.clear();
        scratch.extend_from_slice(window);
        stats::median_in_place(scratch)
    }

    /// Hampel step only: replace outliers by the centered rolling median
    pub fn filter_series(&self, series: &[f64]) -> Vec<f64> {
        let mut filtered = series.to_vec();

        let Some(mad) = stats::mad(series) else {
            debug!("hampel: no finite values in series of {}, left unchanged", series.len());
            return filtered;
        };
        let threshold = self.config.n_sigmas * mad;

        let mut scratch = Vec::with_capacity(self.config.window_size);
        let mut replaced = 0usize;
        for (index, value) in filtered.iter_mut().enumerate() {
            let Some(median) = self.rolling_median_with(series, index, &mut scratch) else {
                continue;
            };
            if libm::fabs(*value - median) > threshold {
                *value = median;
                replaced += 1;
            }
        }

        debug!(
            "hampel: replaced {} of {} points (mad {}, threshold {})",
            replaced,
            series.len(),
            mad,
            threshold
        );
        filtered
    }

    /// Clamp finite values to the configured percentiles of the series itself
    pub fn clip_series(&self, series: &mut [f64]) {
        if let Some(clip) = self.config.clip {
            clip_to_percentiles(series, clip);
        }
    }

    /// Full batch cleaning of one channel: Hampel step, then clipping
    pub fn clean_series(&self, series: &[f64]) -> Vec<f64> {
        let mut cleaned = self.filter_series(series);
        self.clip_series(&mut cleaned);
        cleaned
    }

    /// Clean every channel of a reading sequence independently
    ///
    /// Timestamps are preserved; the output has the same length and order.
    pub fn clean_readings(&self, readings: &[Reading]) -> Vec<Reading> {
        let mut cleaned = readings.to_vec();
        for channel in Channel::ALL {
            let series: Vec<f64> = readings.iter().map(|r| r.value(channel)).collect();
            let values = self.clean_series(&series);
            for (reading, value) in cleaned.iter_mut().zip(values) {
                *reading = reading.with_value(channel, value);
            }
        }
        cleaned
    }
}

fn clip_to_percentiles(series: &mut [f64], clip: PercentileClip) {
    let (Some(lower), Some(upper)) = (
        stats::percentile(series, clip.lower_pct),
        stats::percentile(series, clip.upper_pct),
    ) else {
        return;
    };

    for value in series.iter_mut().filter(|v| v.is_finite()) {
        *value = value.max(lower).min(upper);
    }
}

impl<'a> OutlierFilter<&'a [f64]> for BatchHampel {
    type Output = Vec<f64>;

    fn clean(&mut self, input: &'a [f64]) -> Self::Output {
        self.clean_series(input)
    }
}

impl<'a> OutlierFilter<&'a [Reading]> for BatchHampel {
    type Output = Vec<Reading>;

    fn clean(&mut self, input: &'a [Reading]) -> Self::Output {
        self.clean_readings(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.1).collect()
    }

    fn unclipped() -> BatchHampel {
        BatchHampel::new(HampelConfig::default().without_clipping()).unwrap()
    }

    #[test]
    fn window_spans_five_before_four_after() {
        let filter = unclipped();
        assert_eq!(filter.window_bounds(4, 20), None);
        assert_eq!(filter.window_bounds(5, 20), Some((0, 9)));
        assert_eq!(filter.window_bounds(15, 20), Some((10, 19)));
        assert_eq!(filter.window_bounds(16, 20), None);
    }

    #[test]
    fn odd_window_is_symmetric() {
        let filter = BatchHampel::new(HampelConfig::default().with_window_size(5)).unwrap();
        assert_eq!(filter.window_bounds(2, 10), Some((0, 4)));
        assert_eq!(filter.window_bounds(1, 10), None);
    }

    #[test]
    fn shrink_policy_truncates_edges() {
        let filter = BatchHampel::new(HampelConfig::default().with_boundary(BoundaryPolicy::Shrink)).unwrap();
        assert_eq!(filter.window_bounds(0, 20), Some((0, 4)));
        assert_eq!(filter.window_bounds(19, 20), Some((14, 19)));
    }

    #[test]
    fn single_spike_replaced_by_rolling_median() {
        let mut series = ramp(50);
        series[25] = 100.0;

        let filtered = unclipped().filter_series(&series);

        // Window [20..=29] without the spike: 2.0..2.9 minus 2.5, plus 100
        assert!((filtered[25] - 2.5).abs() < 1e-9);
        for (i, (before, after)) in series.iter().zip(&filtered).enumerate() {
            if i != 25 {
                assert_eq!(before, after, "index {} changed", i);
            }
        }
    }

    #[test]
    fn edge_spike_kept_under_keep_raw() {
        let mut series = ramp(30);
        series[1] = 100.0;

        let kept = unclipped().filter_series(&series);
        assert_eq!(kept[1], 100.0);

        let shrink = BatchHampel::new(
            HampelConfig::default().without_clipping().with_boundary(BoundaryPolicy::Shrink),
        )
        .unwrap();
        assert!(shrink.filter_series(&series)[1] < 1.0);
    }

    #[test]
    fn missing_values_pass_through() {
        let mut series = ramp(30);
        series[12] = f64::NAN;
        series[15] = 50.0;

        let filtered = unclipped().filter_series(&series);
        assert!(filtered[12].is_nan());
        // The window around 15 contains the NaN, so no median is defined there
        assert_eq!(filtered[15], 50.0);
    }

    #[test]
    fn clipping_follows_filtering() {
        let filter = BatchHampel::default();
        let mut series = ramp(200);
        series[100] = 1e6;

        let cleaned = filter.clean_series(&series);
        let upper = stats::percentile(&filter.filter_series(&series), 99.5).unwrap();
        assert!(cleaned.iter().all(|v| *v <= upper));
        assert!(cleaned[100] < 20.0);
    }

    #[test]
    fn all_missing_series_unchanged() {
        let series = [f64::NAN; 12];
        let cleaned = BatchHampel::default().clean_series(&series);
        assert!(cleaned.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn clean_readings_keeps_timestamps() {
        let readings: Vec<Reading> = (0..40)
            .map(|i| {
                let co2 = if i == 20 { 9000.0 } else { 450.0 + (i % 3) as f64 };
                Reading::from_millis(1_000 * i, co2, 22.0, 60.0).unwrap()
            })
            .collect();

        let cleaned = BatchHampel::default().clean_readings(&readings);
        assert_eq!(cleaned.len(), readings.len());
        assert!(cleaned.iter().zip(&readings).all(|(c, r)| c.timestamp_ms == r.timestamp_ms));
        assert!(cleaned[20].co2 < 460.0);
        assert_eq!(cleaned[20].temperature, 22.0);
    }
}
