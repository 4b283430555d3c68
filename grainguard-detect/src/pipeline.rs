//! End-to-end detection over a recorded dataset
//!
//! ```text
//! raw readings ─► BatchHampel ─► cleaned readings ─► WindowAggregator ─┬─► InsectDetector
//!                                                                      └─► FanMalfunctionDetector
//! ```
//!
//! The pipeline owns no I/O: readings come in as a slice, verdicts go out as
//! owned values that no longer borrow the cleaned data.

use alloc::vec::Vec;

use grainguard_core::{BatchHampel, Reading, Timestamp, WindowAggregator};
use log::{debug, info};

use crate::{
    config::PipelineConfig,
    errors::DetectResult,
    fan::FanMalfunctionDetector,
    insect::InsectDetector,
    result::DetectionResult,
};

/// Both verdicts for one window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowVerdict {
    /// Slot number of the window
    pub index: usize,
    /// First reading of the window
    pub start_ms: Timestamp,
    /// Last reading of the window
    pub end_ms: Timestamp,
    /// Readings in the window
    pub len: usize,
    /// Insect detector verdict
    pub insect: DetectionResult,
    /// Fan detector verdict
    pub fan: DetectionResult,
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Cleaned readings, same length and order as the input
    pub cleaned: Vec<Reading>,
    /// One verdict pair per emitted window
    pub verdicts: Vec<WindowVerdict>,
    /// Windows skipped for spanning zero time
    pub skipped_degenerate: usize,
    /// Trailing rows dropped by a count policy
    pub discarded_rows: usize,
}

impl PipelineReport {
    /// Windows where insects were detected
    pub fn insect_windows(&self) -> impl Iterator<Item = &WindowVerdict> {
        self.verdicts.iter().filter(|v| v.insect.is_detected)
    }

    /// Windows where a fan malfunction was detected
    pub fn fan_windows(&self) -> impl Iterator<Item = &WindowVerdict> {
        self.verdicts.iter().filter(|v| v.fan.is_detected)
    }
}

/// Clean, window and judge a recorded dataset
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    filter: BatchHampel,
    aggregator: WindowAggregator,
    insect: InsectDetector,
    fan: FanMalfunctionDetector,
}

impl DetectionPipeline {
    /// Build every stage from one configuration
    pub fn new(config: PipelineConfig) -> DetectResult<Self> {
        config.validate()?;
        Ok(Self {
            filter: BatchHampel::new(config.hampel)?,
            aggregator: WindowAggregator::new(config.window)?,
            insect: InsectDetector::new(config.insect)?,
            fan: FanMalfunctionDetector::new(config.fan)?,
        })
    }

    /// Run on raw readings ordered as the window policy requires
    pub fn run(&self, raw: &[Reading]) -> DetectResult<PipelineReport> {
        let cleaned = self.filter.clean_readings(raw);
        let (verdicts, skipped_degenerate, discarded_rows) = {
            let aggregation = self.aggregator.aggregate(&cleaned)?;
            let verdicts: Vec<WindowVerdict> = aggregation
                .iter()
                .map(|window| WindowVerdict {
                    index: window.index,
                    start_ms: window.start_ms(),
                    end_ms: window.end_ms(),
                    len: window.len(),
                    insect: self.insect.analyze(window),
                    fan: self.fan.analyze(window),
                })
                .collect();
            (verdicts, aggregation.skipped_degenerate, aggregation.discarded_rows)
        };

        for verdict in verdicts.iter().filter(|v| v.insect.is_detected || v.fan.is_detected) {
            debug!(
                "window {} ({}..{} ms): insect {} fan {}",
                verdict.index, verdict.start_ms, verdict.end_ms, verdict.insect.is_detected, verdict.fan.is_detected
            );
        }
        info!("pipeline: {} readings, {} windows judged", raw.len(), verdicts.len());

        Ok(PipelineReport { cleaned, verdicts, skipped_degenerate, discarded_rows })
    }
}
