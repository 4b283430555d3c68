//! Hampel Outlier Filtering
//!
//! ## Overview
//!
//! NDIR CO2 sensors and capacitive humidity sensors produce isolated glitches:
//! a single sample hundreds of ppm off, a humidity reading that jumps 20% and
//! back. The Hampel filter replaces a sample with a local median when it sits
//! further than `n_sigmas × MAD` from that median.
//!
//! Two strategies implement the same [`OutlierFilter`](crate::traits::OutlierFilter)
//! contract:
//!
//! | | [`BatchHampel`] | [`StreamingHampel`] |
//! |---|---|---|
//! | Window | centered, `w` points | trailing, last `w` raw values |
//! | MAD | once, over the whole series | per reading, over the window |
//! | Warm-up / edges | [`BoundaryPolicy`] | first `w - 1` readings pass raw |
//! | Post-processing | percentile clipping | none |
//!
//! The two do **not** produce the same output on the same data. The batch
//! filter is for recorded datasets, the streaming filter for live serial
//! input; each is validated against its own use case.
//!
//! ## MAD Convention
//!
//! The threshold uses the raw MAD, not `1.4826 × MAD`. Detection thresholds
//! were tuned on data cleaned with this convention; switching would require
//! retuning them.

mod batch;
mod streaming;

pub use batch::BatchHampel;
pub use streaming::{CleanerStats, FilterOutcome, StreamError, StreamingCleaner, StreamingHampel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::filter::{
        DEFAULT_CLIP_LOWER_PCT, DEFAULT_CLIP_UPPER_PCT, DEFAULT_HAMPEL_WINDOW, DEFAULT_N_SIGMAS,
    },
    errors::{SignalError, SignalResult},
};

/// What the batch filter does where the centered window does not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryPolicy {
    /// Leave the raw value untouched (no rolling median is defined there)
    #[default]
    KeepRaw,
    /// Use the truncated window that fits inside the series
    Shrink,
}

/// Percentile clipping bounds, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PercentileClip {
    /// Values below this percentile are raised to it
    pub lower_pct: f64,
    /// Values above this percentile are lowered to it
    pub upper_pct: f64,
}

impl Default for PercentileClip {
    fn default() -> Self {
        Self {
            lower_pct: DEFAULT_CLIP_LOWER_PCT,
            upper_pct: DEFAULT_CLIP_UPPER_PCT,
        }
    }
}

/// Hampel filter configuration
///
/// ```rust
/// use grainguard_core::filter::{BoundaryPolicy, HampelConfig};
///
/// let config = HampelConfig::default()
///     .with_window_size(7)
///     .with_n_sigmas(2.5)
///     .with_boundary(BoundaryPolicy::Shrink)
///     .without_clipping();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HampelConfig {
    /// Points in the rolling window
    pub window_size: usize,
    /// Threshold multiplier applied to the MAD
    pub n_sigmas: f64,
    /// Batch edge handling
    pub boundary: BoundaryPolicy,
    /// Batch post-filter clipping; `None` disables it
    pub clip: Option<PercentileClip>,
}

impl Default for HampelConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_HAMPEL_WINDOW,
            n_sigmas: DEFAULT_N_SIGMAS,
            boundary: BoundaryPolicy::KeepRaw,
            clip: Some(PercentileClip::default()),
        }
    }
}

impl HampelConfig {
    /// Set the rolling window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the MAD multiplier
    pub fn with_n_sigmas(mut self, n_sigmas: f64) -> Self {
        self.n_sigmas = n_sigmas;
        self
    }

    /// Set the batch boundary policy
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the clipping percentiles
    pub fn with_clip(mut self, lower_pct: f64, upper_pct: f64) -> Self {
        self.clip = Some(PercentileClip { lower_pct, upper_pct });
        self
    }

    /// Disable percentile clipping
    pub fn without_clipping(mut self) -> Self {
        self.clip = None;
        self
    }

    /// Check that the configuration can be used
    pub fn validate(&self) -> SignalResult<()> {
        if self.window_size == 0 {
            return Err(SignalError::InvalidConfig { reason: "hampel window must hold at least 1 point" });
        }
        if !self.n_sigmas.is_finite() || self.n_sigmas < 0.0 {
            return Err(SignalError::InvalidConfig { reason: "n_sigmas must be a non-negative number" });
        }
        if let Some(clip) = self.clip {
            let in_range = |p: f64| (0.0..=100.0).contains(&p);
            if !in_range(clip.lower_pct) || !in_range(clip.upper_pct) {
                return Err(SignalError::InvalidConfig { reason: "clip percentiles must be within 0-100" });
            }
            if clip.lower_pct >= clip.upper_pct {
                return Err(SignalError::InvalidConfig { reason: "lower clip percentile must be below upper" });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = HampelConfig::default();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.n_sigmas, 3.0);
        assert_eq!(config.boundary, BoundaryPolicy::KeepRaw);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unusable_configs() {
        assert!(HampelConfig::default().with_window_size(0).validate().is_err());
        assert!(HampelConfig::default().with_n_sigmas(-1.0).validate().is_err());
        assert!(HampelConfig::default().with_n_sigmas(f64::NAN).validate().is_err());
        assert!(HampelConfig::default().with_clip(99.5, 0.5).validate().is_err());
        assert!(HampelConfig::default().with_clip(-1.0, 50.0).validate().is_err());
    }
}
