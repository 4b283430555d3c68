//! Insect activity detector
//!
//! Respiring larvae raise the CO2 baseline of a sealed chamber and make it
//! fluctuate. Three boolean criteria are evaluated on one window:
//!
//! | Criterion | Fires when | Default weight |
//! |-----------|-----------|----------------|
//! | level | `mean(co2) > 550` ppm | 0.5 |
//! | variability | `std(rate) > 0.25` ppm/s | 0.3 |
//! | peak | `max(rate) > 1.0` or `min(|rate|) > 0.1` ppm/s | 0.2 |
//!
//! `rate` is the per-sample CO2 rate series of the window. The score is the
//! weighted sum of the criteria that fired; detection requires
//! `score > 0.4`, so the level criterion alone is enough but the other two
//! are needed together.

use alloc::vec::Vec;

use grainguard_core::{constants::MIN_SAMPLES_FOR_RATE, stats, Channel, Window};
use log::debug;

use crate::{
    config::InsectThresholds,
    errors::DetectResult,
    result::DetectionResult,
    traits::WindowDetector,
};

/// CO2 statistics the insect rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InsectFeatures {
    /// Mean CO2 of the window
    pub mean_level: Option<f64>,
    /// Sample standard deviation of the rate series (needs two rates)
    pub std_change: Option<f64>,
    /// Largest rate
    pub max_change: Option<f64>,
    /// Smallest absolute rate
    pub min_change: Option<f64>,
}

impl InsectFeatures {
    /// Features from a window mean and its per-sample rate series
    pub fn from_rates(mean_level: Option<f64>, rates: &[f64]) -> Self {
        Self {
            mean_level,
            std_change: stats::sample_std(rates),
            max_change: stats::max(rates),
            min_change: stats::min_abs(rates),
        }
    }

    /// Features of the CO2 channel of a window
    pub fn from_window(window: &Window<'_>) -> Self {
        let rates: Vec<f64> = window.sample_rates(Channel::Co2);
        Self::from_rates(window.mean(Channel::Co2), &rates)
    }
}

/// Which criteria fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsectCriteria {
    /// Mean CO2 above threshold
    pub level: bool,
    /// Rate variability above threshold
    pub variability: bool,
    /// Peak or minimum change above threshold
    pub peak: bool,
}

/// Weighted three-criterion insect rule
#[derive(Debug, Clone, Copy, Default)]
pub struct InsectDetector {
    thresholds: InsectThresholds,
}

impl InsectDetector {
    /// Create a detector, validating the thresholds
    pub fn new(thresholds: InsectThresholds) -> DetectResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Active thresholds
    pub fn thresholds(&self) -> &InsectThresholds {
        &self.thresholds
    }

    /// Evaluate the three criteria; a missing statistic never fires
    pub fn criteria(&self, features: &InsectFeatures) -> InsectCriteria {
        let t = &self.thresholds;
        let above = |value: Option<f64>, threshold: f64| value.map_or(false, |v| v > threshold);

        InsectCriteria {
            level: above(features.mean_level, t.mean_level),
            variability: above(features.std_change, t.std_change),
            peak: above(features.max_change, t.peak_change) || above(features.min_change, t.min_change),
        }
    }

    /// Weighted score of the criteria that fired
    pub fn score(&self, criteria: &InsectCriteria) -> f64 {
        let t = &self.thresholds;
        let weight = |fired: bool, w: f64| if fired { w } else { 0.0 };
        weight(criteria.level, t.level_weight)
            + weight(criteria.variability, t.variability_weight)
            + weight(criteria.peak, t.peak_weight)
    }

    /// Verdict from precomputed features
    pub fn score_features(&self, features: &InsectFeatures) -> DetectionResult {
        let criteria = self.criteria(features);
        let score = self.score(&criteria);

        DetectionResult::evaluated(score > self.thresholds.score_cutoff, Some(score))
            .with_stat("mean_level", features.mean_level)
            .with_stat("std_change", features.std_change)
            .with_stat("max_change", features.max_change)
            .with_stat("min_change", features.min_change)
            .with_stat("score", Some(score))
    }

    /// Verdict on one window
    ///
    /// Fewer than two readings means no rate exists: the result is "not
    /// detected" with an insufficient-data status.
    pub fn analyze(&self, window: &Window<'_>) -> DetectionResult {
        if window.len() < MIN_SAMPLES_FOR_RATE {
            debug!("insect: window {} has {} readings, not evaluated", window.index, window.len());
            return DetectionResult::insufficient(MIN_SAMPLES_FOR_RATE, window.len());
        }
        let result = self.score_features(&InsectFeatures::from_window(window));
        debug!(
            "insect: window {} score {:?} detected {}",
            window.index, result.score, result.is_detected
        );
        result
    }
}

impl WindowDetector for InsectDetector {
    fn name(&self) -> &'static str {
        "insect"
    }

    fn detect(&self, window: &Window<'_>) -> DetectionResult {
        self.analyze(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainguard_core::Reading;

    fn score_of(result: &DetectionResult) -> f64 {
        result.score.unwrap()
    }

    #[test]
    fn all_criteria_fire() {
        let features = InsectFeatures {
            mean_level: Some(600.0),
            std_change: Some(0.3),
            max_change: Some(1.2),
            min_change: Some(0.05),
        };
        let result = InsectDetector::default().score_features(&features);
        assert!((score_of(&result) - 1.0).abs() < 1e-9);
        assert!(result.is_detected);
        assert_eq!(result.stat("mean_level"), Some(600.0));
    }

    #[test]
    fn no_criteria_fire() {
        let features = InsectFeatures {
            mean_level: Some(400.0),
            std_change: Some(0.1),
            max_change: Some(0.05),
            min_change: Some(0.02),
        };
        let result = InsectDetector::default().score_features(&features);
        assert_eq!(score_of(&result), 0.0);
        assert!(!result.is_detected);
    }

    #[test]
    fn level_alone_is_enough() {
        let features = InsectFeatures { mean_level: Some(700.0), ..Default::default() };
        let result = InsectDetector::default().score_features(&features);
        assert_eq!(score_of(&result), 0.5);
        assert!(result.is_detected);
    }

    #[test]
    fn variability_and_peak_together_reach_cutoff() {
        let detector = InsectDetector::default();
        let features = InsectFeatures {
            mean_level: Some(450.0),
            std_change: Some(0.5),
            max_change: Some(0.5),
            min_change: Some(0.2),
        };
        let result = detector.score_features(&features);
        assert!((score_of(&result) - 0.5).abs() < 1e-9);
        assert!(result.is_detected);

        let only_peak = InsectFeatures { std_change: Some(0.1), ..features };
        assert!(!detector.score_features(&only_peak).is_detected);
    }

    #[test]
    fn single_rate_has_no_variability() {
        let features = InsectFeatures::from_rates(Some(400.0), &[3.0]);
        assert_eq!(features.std_change, None);
        let criteria = InsectDetector::default().criteria(&features);
        assert!(!criteria.variability);
        assert!(criteria.peak);
    }

    #[test]
    fn short_window_is_insufficient() {
        let readings = [Reading::from_millis(0, 900.0, 20.0, 60.0).unwrap()];
        let window = Window::new(0, &readings).unwrap();
        let result = InsectDetector::default().analyze(&window);
        assert!(!result.is_detected);
        assert!(result.is_insufficient());
    }

    #[test]
    fn rates_come_from_timestamps() {
        // +2 ppm every 10 s -> 0.2 ppm/s everywhere
        let readings: Vec<Reading> = (0..10)
            .map(|i| Reading::from_millis(i * 10_000, 500.0 + 2.0 * i as f64, 20.0, 60.0).unwrap())
            .collect();
        let features = InsectFeatures::from_window(&Window::new(0, &readings).unwrap());
        assert!((features.max_change.unwrap() - 0.2).abs() < 1e-12);
        assert!((features.min_change.unwrap() - 0.2).abs() < 1e-12);
        assert!(features.std_change.unwrap() < 1e-9);
    }
}
