//! Dataset-level statistics over emitted windows
//!
//! A dataset recorded with insects and one recorded without are compared on
//! the distribution of their window rates ([`RateSummary`]) and on the
//! average per-window change and level of each channel ([`ChannelOverview`]).

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Window;
use crate::{reading::Channel, stats};

/// Distribution of per-window net rates of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RateSummary {
    /// Windows contributing a rate
    pub windows: usize,
    /// Mean rate per second
    pub mean: f64,
    /// Median rate per second
    pub median: f64,
    /// Sample standard deviation (n - 1); `None` for a single window
    pub std: Option<f64>,
    /// Largest rate
    pub max_increase: f64,
    /// Smallest rate (most negative when any window falls)
    pub max_decrease: f64,
    /// Windows with a strictly positive rate
    pub increasing: usize,
    /// Windows with a strictly negative rate
    pub decreasing: usize,
}

impl RateSummary {
    /// Summarize a series of window rates; non-finite rates are ignored
    ///
    /// ```rust
    /// use grainguard_core::window::RateSummary;
    ///
    /// let summary = RateSummary::from_rates(&[0.02, -0.01, 0.05, 0.0]).unwrap();
    /// assert_eq!(summary.windows, 4);
    /// assert_eq!(summary.max_decrease, -0.01);
    /// assert_eq!((summary.increasing, summary.decreasing), (2, 1));
    /// ```
    pub fn from_rates(rates: &[f64]) -> Option<Self> {
        let rates: Vec<f64> = rates.iter().copied().filter(|r| r.is_finite()).collect();

        Some(Self {
            windows: rates.len(),
            mean: stats::mean(&rates)?,
            median: stats::median(&rates)?,
            std: stats::sample_std(&rates),
            max_increase: stats::max(&rates)?,
            max_decrease: stats::min(&rates)?,
            increasing: rates.iter().filter(|&&r| r > 0.0).count(),
            decreasing: rates.iter().filter(|&&r| r < 0.0).count(),
        })
    }
}

/// Averages of one channel across windows
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelOverview {
    /// Mean of the per-window net changes (`last - first`)
    pub mean_change: Option<f64>,
    /// Mean of the per-window means
    pub mean_level: Option<f64>,
}

impl ChannelOverview {
    /// Average over `windows`; windows with missing values are skipped per statistic
    pub fn from_windows(windows: &[Window<'_>], channel: Channel) -> Self {
        let changes: Vec<f64> = windows.iter().map(|w| w.summary(channel).net_change).collect();
        let levels: Vec<f64> = windows.iter().filter_map(|w| w.mean(channel)).collect();

        Self {
            mean_change: stats::mean(&changes),
            mean_level: stats::mean(&levels),
        }
    }
}
