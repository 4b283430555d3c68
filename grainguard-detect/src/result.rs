//! Detector verdicts

use log::warn;

/// Named statistics behind a verdict
///
/// Fixed capacity; detectors record at most five values.
pub type ComponentStats = heapless::FnvIndexMap<&'static str, f64, 8>;

/// Whether a window could be judged at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStatus {
    /// The window held enough samples
    Evaluated,
    /// Too few samples; the verdict is "not detected" by convention
    InsufficientData {
        /// Samples the detector needs
        required: usize,
        /// Samples the window had
        available: usize,
    },
}

/// Verdict of one detector on one window
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Whether the condition was detected
    pub is_detected: bool,
    /// Weighted score in `[0, 1]` (insect detector only)
    pub score: Option<f64>,
    /// Evaluated or insufficient data
    pub status: DetectionStatus,
    /// Statistics the verdict was derived from
    pub component_stats: ComponentStats,
}

// `IndexMap` only implements `PartialEq` for `Eq` values; stats are compared
// entry by entry in insertion order.
impl PartialEq for DetectionResult {
    fn eq(&self, other: &Self) -> bool {
        self.is_detected == other.is_detected
            && self.score == other.score
            && self.status == other.status
            && self.component_stats.iter().eq(other.component_stats.iter())
    }
}

impl DetectionResult {
    /// A verdict on a window with enough data
    pub fn evaluated(is_detected: bool, score: Option<f64>) -> Self {
        Self {
            is_detected,
            score,
            status: DetectionStatus::Evaluated,
            component_stats: ComponentStats::new(),
        }
    }

    /// Non-detection because the window was too small
    pub fn insufficient(required: usize, available: usize) -> Self {
        Self {
            is_detected: false,
            score: None,
            status: DetectionStatus::InsufficientData { required, available },
            component_stats: ComponentStats::new(),
        }
    }

    /// Record a statistic; `None` values are left out
    pub fn with_stat(mut self, name: &'static str, value: Option<f64>) -> Self {
        if let Some(value) = value {
            if self.component_stats.insert(name, value).is_err() {
                warn!("component stats full, dropped {}", name);
            }
        }
        self
    }

    /// Look up a recorded statistic
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.component_stats.get(name).copied()
    }

    /// Whether the window was too small to judge
    pub fn is_insufficient(&self) -> bool {
        matches!(self.status, DetectionStatus::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_is_never_detected() {
        let result = DetectionResult::insufficient(2, 1);
        assert!(!result.is_detected);
        assert!(result.is_insufficient());
        assert_eq!(result.score, None);
    }

    #[test]
    fn equality_compares_stats() {
        let a = DetectionResult::evaluated(false, None).with_stat("temp_max_change", Some(0.2));
        let b = DetectionResult::evaluated(false, None).with_stat("temp_max_change", Some(0.2));
        let c = DetectionResult::evaluated(false, None).with_stat("temp_max_change", Some(0.3));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, DetectionResult::evaluated(false, None));
    }

    #[test]
    fn stats_skip_missing_values() {
        let result = DetectionResult::evaluated(true, Some(0.7))
            .with_stat("mean_level", Some(612.0))
            .with_stat("std_change", None);
        assert_eq!(result.stat("mean_level"), Some(612.0));
        assert_eq!(result.stat("std_change"), None);
        assert_eq!(result.component_stats.len(), 1);
    }
}
