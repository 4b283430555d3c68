//! Detector seam

use grainguard_core::Window;

use crate::result::DetectionResult;

/// A rule that judges one window at a time
///
/// Implementations hold their configuration and no per-window state, so one
/// detector can be shared across datasets.
pub trait WindowDetector {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Judge one window
    fn detect(&self, window: &Window<'_>) -> DetectionResult;
}

impl<D: WindowDetector + ?Sized> WindowDetector for &D {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(&self, window: &Window<'_>) -> DetectionResult {
        (**self).detect(window)
    }
}
