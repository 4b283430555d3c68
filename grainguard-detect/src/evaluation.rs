//! Offline evaluation against labelled datasets
//!
//! One dataset recorded with insects (every window is a positive) and one
//! without (every window is a negative) are windowed, judged, and tallied.
//!
//! Windows a detector cannot judge count as predicted negatives, exactly as
//! the runtime path reports them, and are also counted separately so a poor
//! recall caused by short windows is visible. Windows the aggregator skipped
//! for spanning zero time are among them.
//!
//! [`compare_window_rates`] contrasts the two datasets directly: the
//! distribution of window rates in each, and a two-sample t statistic.

use alloc::vec::Vec;

use grainguard_core::{stats, Channel, RateSummary, Reading, Window, WindowAggregator};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{errors::{DetectResult, MetricError}, traits::WindowDetector};

/// True/false positive/negative counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfusionTally {
    /// Positive window, detected
    pub true_positives: u32,
    /// Negative window, detected
    pub false_positives: u32,
    /// Negative window, not detected
    pub true_negatives: u32,
    /// Positive window, not detected
    pub false_negatives: u32,
}

fn ratio(metric: &'static str, numerator: f64, denominator: f64) -> Result<f64, MetricError> {
    if denominator == 0.0 {
        Err(MetricError::Undefined { metric })
    } else {
        Ok(numerator / denominator)
    }
}

impl ConfusionTally {
    /// Tally from explicit counts
    pub const fn new(true_positives: u32, false_positives: u32, true_negatives: u32, false_negatives: u32) -> Self {
        Self { true_positives, false_positives, true_negatives, false_negatives }
    }

    /// Record one verdict against its ground truth
    pub fn record(&mut self, actual: bool, predicted: bool) {
        match (actual, predicted) {
            (true, true) => self.true_positives += 1,
            (false, true) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
            (true, false) => self.false_negatives += 1,
        }
    }

    /// Add another tally
    pub fn merge(&mut self, other: &ConfusionTally) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.true_negatives += other.true_negatives;
        self.false_negatives += other.false_negatives;
    }

    /// Windows tallied
    pub fn total(&self) -> u32 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// `(TP + TN) / total`
    pub fn accuracy(&self) -> Result<f64, MetricError> {
        ratio(
            "accuracy",
            f64::from(self.true_positives + self.true_negatives),
            f64::from(self.total()),
        )
    }

    /// `TP / (TP + FP)`
    pub fn precision(&self) -> Result<f64, MetricError> {
        ratio(
            "precision",
            f64::from(self.true_positives),
            f64::from(self.true_positives + self.false_positives),
        )
    }

    /// `TP / (TP + FN)`
    pub fn recall(&self) -> Result<f64, MetricError> {
        ratio(
            "recall",
            f64::from(self.true_positives),
            f64::from(self.true_positives + self.false_negatives),
        )
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self) -> Result<f64, MetricError> {
        let precision = self.precision()?;
        let recall = self.recall()?;
        ratio("f1", 2.0 * precision * recall, precision + recall)
    }

    /// All four metrics; fails on the first undefined one
    pub fn metrics(&self) -> Result<Metrics, MetricError> {
        Ok(Metrics {
            accuracy: self.accuracy()?,
            precision: self.precision()?,
            recall: self.recall()?,
            f1: self.f1()?,
        })
    }
}

/// Derived metrics of a tally
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metrics {
    /// Fraction of windows judged correctly
    pub accuracy: f64,
    /// Fraction of detections that were real
    pub precision: f64,
    /// Fraction of real positives detected
    pub recall: f64,
    /// F1 score
    pub f1: f64,
}

/// Outcome of an evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Confusion counters; insufficient windows are predicted negatives
    pub tally: ConfusionTally,
    /// Windows the detector could not judge, degenerate windows included
    pub insufficient: u32,
    /// Windows skipped by the aggregator for spanning zero time
    pub degenerate: u32,
}

impl Evaluation {
    /// Metrics of the tally
    pub fn metrics(&self) -> Result<Metrics, MetricError> {
        self.tally.metrics()
    }

    /// Tally `count` windows that never reached the detector
    fn record_degenerate(&mut self, actual: bool, count: usize) {
        for _ in 0..count {
            self.tally.record(actual, false);
            self.insufficient += 1;
            self.degenerate += 1;
        }
    }
}

/// Runs one detector over labelled windows
#[derive(Debug, Clone)]
pub struct Evaluator<D> {
    detector: D,
}

impl<D: WindowDetector> Evaluator<D> {
    /// Evaluate `detector`
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// The detector under evaluation
    pub fn detector(&self) -> &D {
        &self.detector
    }

    fn judge(&self, evaluation: &mut Evaluation, windows: &[Window<'_>], actual: bool) {
        for window in windows {
            let result = self.detector.detect(window);
            if result.is_insufficient() {
                evaluation.insufficient += 1;
            }
            evaluation.tally.record(actual, result.is_detected);
        }
    }

    /// Judge every window of a positive and a negative stream
    pub fn evaluate(&self, positives: &[Window<'_>], negatives: &[Window<'_>]) -> Evaluation {
        let mut evaluation = Evaluation::default();
        self.judge(&mut evaluation, positives, true);
        self.judge(&mut evaluation, negatives, false);

        debug!(
            "{}: evaluated {} windows ({} insufficient): {:?}",
            self.detector.name(),
            evaluation.tally.total(),
            evaluation.insufficient,
            evaluation.tally
        );
        evaluation
    }

    /// Window two cleaned datasets with `aggregator` and evaluate them
    ///
    /// Degenerate windows the aggregator skipped are tallied as insufficient.
    pub fn evaluate_datasets(
        &self,
        aggregator: &WindowAggregator,
        positive: &[Reading],
        negative: &[Reading],
    ) -> DetectResult<Evaluation> {
        let positives = aggregator.aggregate(positive)?;
        let negatives = aggregator.aggregate(negative)?;

        let mut evaluation = self.evaluate(&positives.windows, &negatives.windows);
        evaluation.record_degenerate(true, positives.skipped_degenerate);
        evaluation.record_degenerate(false, negatives.skipped_degenerate);
        Ok(evaluation)
    }
}

/// Student's two-sample t test with pooled variance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoSampleT {
    /// `(mean_a - mean_b) / (s_p · sqrt(1/n_a + 1/n_b))`
    pub t_statistic: f64,
    /// `n_a + n_b - 2`
    pub degrees_of_freedom: usize,
    /// `mean_a - mean_b`
    pub mean_difference: f64,
}

impl TwoSampleT {
    /// Compare the finite values of two samples
    ///
    /// Undefined when either sample is empty, when both together hold fewer
    /// than three values, or when the pooled variance is zero.
    ///
    /// ```rust
    /// use grainguard_detect::TwoSampleT;
    ///
    /// let test = TwoSampleT::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
    /// assert_eq!(test.degrees_of_freedom, 8);
    /// assert!((test.t_statistic + 1.897_366_6).abs() < 1e-6);
    /// ```
    pub fn compute(a: &[f64], b: &[f64]) -> Result<Self, MetricError> {
        const METRIC: &str = "t_statistic";
        let undefined = MetricError::Undefined { metric: METRIC };

        let a: Vec<f64> = a.iter().copied().filter(|v| v.is_finite()).collect();
        let b: Vec<f64> = b.iter().copied().filter(|v| v.is_finite()).collect();
        let (mean_a, mean_b) = (stats::mean(&a).ok_or(undefined)?, stats::mean(&b).ok_or(undefined)?);

        let degrees_of_freedom = (a.len() + b.len()).checked_sub(2).filter(|&df| df > 0).ok_or(undefined)?;
        let squares = |values: &[f64], center: f64| -> f64 {
            values.iter().map(|v| (v - center) * (v - center)).sum()
        };
        let pooled = (squares(&a, mean_a) + squares(&b, mean_b)) / degrees_of_freedom as f64;
        let scale = 1.0 / a.len() as f64 + 1.0 / b.len() as f64;
        let standard_error = libm::sqrt(pooled * scale);
        let mean_difference = mean_a - mean_b;

        Ok(Self {
            t_statistic: ratio(METRIC, mean_difference, standard_error)?,
            degrees_of_freedom,
            mean_difference,
        })
    }
}

/// Window-rate comparison of a positive and a negative dataset
#[derive(Debug, Clone, PartialEq)]
pub struct RateComparison {
    /// Channel compared
    pub channel: Channel,
    /// Rate distribution of the positive dataset, `None` without windows
    pub positive: Option<RateSummary>,
    /// Rate distribution of the negative dataset, `None` without windows
    pub negative: Option<RateSummary>,
    /// t test of positive against negative window rates
    pub t_test: Result<TwoSampleT, MetricError>,
}

/// Window both datasets and compare their window rates on `channel`
///
/// Only ordering errors from aggregation fail the call; a comparison that is
/// statistically undefined is reported in [`RateComparison::t_test`].
pub fn compare_window_rates(
    aggregator: &WindowAggregator,
    channel: Channel,
    positive: &[Reading],
    negative: &[Reading],
) -> DetectResult<RateComparison> {
    let positive_rates = aggregator.aggregate(positive)?.rates(channel);
    let negative_rates = aggregator.aggregate(negative)?.rates(channel);
    let t_test = TwoSampleT::compute(&positive_rates, &negative_rates);

    debug!(
        "{}: {} vs {} window rates, t test {:?}",
        channel,
        positive_rates.len(),
        negative_rates.len(),
        t_test
    );
    Ok(RateComparison {
        channel,
        positive: RateSummary::from_rates(&positive_rates),
        negative: RateSummary::from_rates(&negative_rates),
        t_test,
    })
}
