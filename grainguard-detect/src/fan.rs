//! Fan malfunction detector
//!
//! A running aeration fan keeps temperature and humidity smooth. When it
//! stalls or cycles erratically, consecutive readings jump. The rule is a
//! pure peak threshold on successive differences within the first
//! `window_ms` of a window; there is no weighting and no score.

use grainguard_core::{constants::MIN_SAMPLES_FOR_RATE, stats, Channel, Window};
use log::debug;

use crate::{
    config::FanThresholds,
    errors::DetectResult,
    result::DetectionResult,
    traits::WindowDetector,
};

/// Peak-step rule on temperature and humidity
#[derive(Debug, Clone, Copy, Default)]
pub struct FanMalfunctionDetector {
    thresholds: FanThresholds,
}

impl FanMalfunctionDetector {
    /// Create a detector, validating the thresholds
    pub fn new(thresholds: FanThresholds) -> DetectResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Active thresholds
    pub fn thresholds(&self) -> &FanThresholds {
        &self.thresholds
    }

    /// Verdict on one window
    pub fn analyze(&self, window: &Window<'_>) -> DetectionResult {
        let inspected = window.head(self.thresholds.window_ms);
        if inspected.len() < MIN_SAMPLES_FOR_RATE {
            return DetectionResult::insufficient(MIN_SAMPLES_FOR_RATE, inspected.len());
        }

        let temp_step = stats::max_abs(&inspected.successive_differences(Channel::Temperature));
        let humid_step = stats::max_abs(&inspected.successive_differences(Channel::Humidity));

        let temp_peak = temp_step.map_or(false, |s| s > self.thresholds.temp_max_change);
        let humid_peak = humid_step.map_or(false, |s| s > self.thresholds.humid_max_change);
        let detected = temp_peak || humid_peak;

        if detected {
            debug!(
                "fan: window {} steps temperature {:?} humidity {:?}",
                window.index, temp_step, humid_step
            );
        }

        DetectionResult::evaluated(detected, None)
            .with_stat("temp_max_change", temp_step)
            .with_stat("humid_max_change", humid_step)
    }
}

impl WindowDetector for FanMalfunctionDetector {
    fn name(&self) -> &'static str {
        "fan"
    }

    fn detect(&self, window: &Window<'_>) -> DetectionResult {
        self.analyze(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use grainguard_core::Reading;

    const MINUTE: u64 = 60_000;

    fn climate(points: &[(f64, f64)]) -> Vec<Reading> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(t, h))| Reading::from_millis(i as u64 * MINUTE, 450.0, t, h).unwrap())
            .collect()
    }

    #[test]
    fn small_steps_not_detected() {
        let readings = climate(&[(20.0, 60.0), (20.3, 61.5), (20.0, 60.0), (20.3, 61.5), (20.6, 63.0)]);
        let result = FanMalfunctionDetector::default().analyze(&Window::new(0, &readings).unwrap());
        assert!(!result.is_detected);
        assert_eq!(result.score, None);
    }

    #[test]
    fn temperature_jump_detected() {
        let readings = climate(&[(20.0, 60.0), (20.1, 60.2), (20.6, 60.1), (20.6, 60.0)]);
        let result = FanMalfunctionDetector::default().analyze(&Window::new(0, &readings).unwrap());
        assert!(result.is_detected);
        assert!((result.stat("temp_max_change").unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn humidity_drop_detected() {
        let readings = climate(&[(20.0, 60.0), (20.0, 57.5), (20.0, 57.4)]);
        assert!(FanMalfunctionDetector::default().analyze(&Window::new(0, &readings).unwrap()).is_detected);
    }

    #[test]
    fn jumps_after_inspected_span_ignored() {
        let mut points = vec![(20.0, 60.0); 30];
        points.push((25.0, 60.0)); // minute 30, outside [0, 30 min)
        let readings = climate(&points);
        let result = FanMalfunctionDetector::default().analyze(&Window::new(0, &readings).unwrap());
        assert!(!result.is_detected);
    }

    #[test]
    fn single_reading_is_insufficient() {
        let readings = climate(&[(20.0, 60.0)]);
        let result = FanMalfunctionDetector::default().analyze(&Window::new(0, &readings).unwrap());
        assert!(result.is_insufficient());
        assert!(!result.is_detected);
    }
}
