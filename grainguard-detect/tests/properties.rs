//! Property tests for scoring and metrics

use grainguard_detect::{ConfusionTally, InsectDetector, InsectFeatures};
use proptest::prelude::*;

fn feature() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(0.0f64..2000.0)
}

proptest! {
    #[test]
    fn score_stays_in_unit_interval(
        mean_level in feature(),
        std_change in feature(),
        max_change in feature(),
        min_change in feature(),
    ) {
        let features = InsectFeatures { mean_level, std_change, max_change, min_change };
        let result = InsectDetector::default().score_features(&features);
        let score = result.score.unwrap();

        prop_assert!((0.0..=1.0 + 1e-9).contains(&score));
        prop_assert_eq!(result.is_detected, score > 0.4);
    }

    #[test]
    fn metrics_defined_are_fractions(tp in 0u32..50, fp in 0u32..50, tn in 0u32..50, fn_ in 0u32..50) {
        let tally = ConfusionTally::new(tp, fp, tn, fn_);
        for metric in [tally.accuracy(), tally.precision(), tally.recall(), tally.f1()] {
            if let Ok(value) = metric {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
        prop_assert_eq!(tally.accuracy().is_ok(), tally.total() > 0);
        prop_assert_eq!(tally.precision().is_ok(), tp + fp > 0);
    }
}
