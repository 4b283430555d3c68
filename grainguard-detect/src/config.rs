//! Detector configuration
//!
//! Thresholds come from the light-infestation experiment (0.4-0.5 % mealworms
//! by mass in wheat) and the fan-stop trials. They are passed to each detector
//! at construction, so differently tuned detectors can run side by side.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use grainguard_core::{constants::MS_PER_MINUTE, HampelConfig, WindowPolicy};

use crate::errors::{DetectError, DetectResult};

/// Mean CO2 above which the level criterion fires (ppm)
pub const DEFAULT_MEAN_LEVEL_PPM: f64 = 550.0;
/// Standard deviation of the CO2 rate above which variability fires (ppm/s)
pub const DEFAULT_STD_CHANGE: f64 = 0.25;
/// Largest CO2 rate above which the peak criterion fires (ppm/s)
pub const DEFAULT_PEAK_CHANGE: f64 = 1.0;
/// Smallest absolute CO2 rate above which the peak criterion fires (ppm/s)
pub const DEFAULT_MIN_CHANGE: f64 = 0.1;
/// Score a window must exceed to count as infested
pub const DEFAULT_SCORE_CUTOFF: f64 = 0.4;

/// Largest temperature step between consecutive readings (°C)
pub const DEFAULT_TEMP_MAX_CHANGE: f64 = 0.4;
/// Largest humidity step between consecutive readings (%RH)
pub const DEFAULT_HUMID_MAX_CHANGE: f64 = 2.0;
/// Span inspected by the fan detector from the first reading of a window
pub const DEFAULT_FAN_WINDOW_MS: u64 = 30 * MS_PER_MINUTE;

/// Insect detector thresholds and weights
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsectThresholds {
    /// Level criterion: `mean(co2) > mean_level`
    pub mean_level: f64,
    /// Variability criterion: `std(rate) > std_change`
    pub std_change: f64,
    /// Peak criterion, first half: `max(rate) > peak_change`
    pub peak_change: f64,
    /// Peak criterion, second half: `min(|rate|) > min_change`
    pub min_change: f64,
    /// Weight of the level criterion
    pub level_weight: f64,
    /// Weight of the variability criterion
    pub variability_weight: f64,
    /// Weight of the peak criterion
    pub peak_weight: f64,
    /// Detection fires when the score is strictly above this
    pub score_cutoff: f64,
}

impl Default for InsectThresholds {
    fn default() -> Self {
        Self {
            mean_level: DEFAULT_MEAN_LEVEL_PPM,
            std_change: DEFAULT_STD_CHANGE,
            peak_change: DEFAULT_PEAK_CHANGE,
            min_change: DEFAULT_MIN_CHANGE,
            level_weight: 0.5,
            variability_weight: 0.3,
            peak_weight: 0.2,
            score_cutoff: DEFAULT_SCORE_CUTOFF,
        }
    }
}

impl InsectThresholds {
    /// Set the CO2 level threshold
    pub fn with_mean_level(mut self, ppm: f64) -> Self {
        self.mean_level = ppm;
        self
    }

    /// Set the rate variability threshold
    pub fn with_std_change(mut self, std_change: f64) -> Self {
        self.std_change = std_change;
        self
    }

    /// Set both peak thresholds
    pub fn with_peak(mut self, peak_change: f64, min_change: f64) -> Self {
        self.peak_change = peak_change;
        self.min_change = min_change;
        self
    }

    /// Set the criterion weights
    pub fn with_weights(mut self, level: f64, variability: f64, peak: f64) -> Self {
        self.level_weight = level;
        self.variability_weight = variability;
        self.peak_weight = peak;
        self
    }

    /// Set the detection cutoff
    pub fn with_score_cutoff(mut self, cutoff: f64) -> Self {
        self.score_cutoff = cutoff;
        self
    }

    /// Check weights and cutoff
    ///
    /// Weights must be non-negative and sum to at most 1 so that the score
    /// stays within `[0, 1]`.
    pub fn validate(&self) -> DetectResult<()> {
        let weights = [self.level_weight, self.variability_weight, self.peak_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DetectError::InvalidConfig { reason: "insect weights must be non-negative" });
        }
        if weights.iter().sum::<f64>() > 1.0 + 1e-9 {
            return Err(DetectError::InvalidConfig { reason: "insect weights must sum to at most 1" });
        }
        if !(0.0..=1.0).contains(&self.score_cutoff) {
            return Err(DetectError::InvalidConfig { reason: "score cutoff must be within 0-1" });
        }
        let thresholds = [self.mean_level, self.std_change, self.peak_change, self.min_change];
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(DetectError::InvalidConfig { reason: "insect thresholds must be finite" });
        }
        Ok(())
    }
}

/// Fan malfunction thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FanThresholds {
    /// Largest tolerated temperature step (°C per reading interval)
    pub temp_max_change: f64,
    /// Largest tolerated humidity step (%RH per reading interval)
    pub humid_max_change: f64,
    /// Span inspected from the first reading of the window
    pub window_ms: u64,
}

impl Default for FanThresholds {
    fn default() -> Self {
        Self {
            temp_max_change: DEFAULT_TEMP_MAX_CHANGE,
            humid_max_change: DEFAULT_HUMID_MAX_CHANGE,
            window_ms: DEFAULT_FAN_WINDOW_MS,
        }
    }
}

impl FanThresholds {
    /// Set the temperature step threshold
    pub fn with_temp_max_change(mut self, celsius: f64) -> Self {
        self.temp_max_change = celsius;
        self
    }

    /// Set the humidity step threshold
    pub fn with_humid_max_change(mut self, percent: f64) -> Self {
        self.humid_max_change = percent;
        self
    }

    /// Set the inspected span
    pub fn with_window_ms(mut self, window_ms: u64) -> Self {
        self.window_ms = window_ms;
        self
    }

    /// Check thresholds and span
    pub fn validate(&self) -> DetectResult<()> {
        let steps = [self.temp_max_change, self.humid_max_change];
        if steps.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(DetectError::InvalidConfig { reason: "fan thresholds must be non-negative" });
        }
        if self.window_ms == 0 {
            return Err(DetectError::InvalidConfig { reason: "fan window must be positive" });
        }
        Ok(())
    }
}

/// Everything the detection pipeline needs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Batch cleaning
    pub hampel: HampelConfig,
    /// Windowing
    pub window: WindowPolicy,
    /// Insect detector
    pub insect: InsectThresholds,
    /// Fan detector
    pub fan: FanThresholds,
}

impl PipelineConfig {
    /// Set the cleaning configuration
    pub fn with_hampel(mut self, hampel: HampelConfig) -> Self {
        self.hampel = hampel;
        self
    }

    /// Set the windowing policy
    pub fn with_window(mut self, window: WindowPolicy) -> Self {
        self.window = window;
        self
    }

    /// Set the insect thresholds
    pub fn with_insect(mut self, insect: InsectThresholds) -> Self {
        self.insect = insect;
        self
    }

    /// Set the fan thresholds
    pub fn with_fan(mut self, fan: FanThresholds) -> Self {
        self.fan = fan;
        self
    }

    /// Validate every part
    pub fn validate(&self) -> DetectResult<()> {
        self.hampel.validate()?;
        self.window.validate()?;
        self.insect.validate()?;
        self.fan.validate()
    }
}
