//! Loading detector configuration from JSON

#![cfg(feature = "serde")]

use grainguard_core::WindowPolicy;
use grainguard_detect::{DetectionPipeline, FanThresholds, InsectThresholds, PipelineConfig};

#[test]
fn field_tuned_thresholds() {
    let json = r#"{
        "insect": { "mean_level": 600.0, "score_cutoff": 0.45 },
        "fan": { "temp_max_change": 0.5 },
        "window": { "count": { "rows": 30 } }
    }"#;
    let config: PipelineConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.insect, InsectThresholds::default().with_mean_level(600.0).with_score_cutoff(0.45));
    assert_eq!(config.fan, FanThresholds::default().with_temp_max_change(0.5));
    assert_eq!(config.window, WindowPolicy::Count { rows: 30 });
    assert!(DetectionPipeline::new(config).is_ok());
}

#[test]
fn empty_document_is_default() {
    let config: PipelineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn bad_weights_rejected_at_construction() {
    let json = r#"{ "insect": { "level_weight": 0.9 } }"#;
    let config: PipelineConfig = serde_json::from_str(json).unwrap();
    assert!(DetectionPipeline::new(config).is_err());
}
