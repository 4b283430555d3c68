//! Rule-Based Anomaly Detection for Grain Storage Windows
//!
//! ## Overview
//!
//! This crate judges windows produced by `grainguard-core` with two fixed,
//! tunable rules:
//!
//! - [`InsectDetector`]: weighted three-criterion score on the CO2 channel
//! - [`FanMalfunctionDetector`]: peak-step threshold on temperature and humidity
//!
//! and validates them offline with the [`Evaluator`] and
//! [`compare_window_rates`].
//!
//! ## Why Rules Instead of a Model?
//!
//! 1. **Explainable**: every verdict carries the statistics it came from
//! 2. **Tiny**: a handful of `f64` thresholds per detector
//! 3. **Tunable in the field**: thresholds are configuration, not weights
//!
//! ## Verdicts
//!
//! ```text
//! Window ─► detector ─► DetectionResult { is_detected, score, status, component_stats }
//! ```
//!
//! A window with too few readings is never an error: the verdict is "not
//! detected" with [`DetectionStatus::InsufficientData`], so a short window is
//! distinguishable from a genuine negative.
//!
//! ## Example
//!
//! ```rust
//! use grainguard_core::{Reading, Window};
//! use grainguard_detect::{InsectDetector, InsectThresholds, WindowDetector};
//!
//! let readings: Vec<Reading> = (0..32)
//!     .map(|i| Reading::from_millis(i * 60_000, 640.0 + (i % 4) as f64, 18.0, 62.0).unwrap())
//!     .collect();
//! let window = Window::new(0, &readings).unwrap();
//!
//! let detector = InsectDetector::new(InsectThresholds::default()).unwrap();
//! let verdict = detector.detect(&window);
//! assert!(verdict.is_detected);
//! assert_eq!(verdict.stat("mean_level"), Some(641.5));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod errors;
pub mod evaluation;
pub mod fan;
pub mod insect;
pub mod pipeline;
pub mod result;
pub mod traits;

pub use config::{FanThresholds, InsectThresholds, PipelineConfig};
pub use errors::{DetectError, DetectResult, MetricError};
pub use evaluation::{
    compare_window_rates, ConfusionTally, Evaluation, Evaluator, Metrics, RateComparison, TwoSampleT,
};
pub use fan::FanMalfunctionDetector;
pub use insect::{InsectCriteria, InsectDetector, InsectFeatures};
pub use pipeline::{DetectionPipeline, PipelineReport, WindowVerdict};
pub use result::{ComponentStats, DetectionResult, DetectionStatus};
pub use traits::WindowDetector;
