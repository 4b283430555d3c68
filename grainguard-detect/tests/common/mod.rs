//! Seeded chamber datasets for detection tests

#![allow(dead_code)]

use grainguard_core::Reading;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One minute in milliseconds
pub const MINUTE_MS: u64 = 60_000;

/// Chamber conditions to simulate
#[derive(Debug, Clone, Copy)]
pub enum Chamber {
    /// Empty chamber, fan running
    Healthy,
    /// Larvae respiring, fan running
    Infested,
    /// Empty chamber, fan stopping for the second half of every `period` minutes
    FanFault {
        /// Cycle length in minutes
        period: u64,
    },
}

/// `minutes` readings at one-minute intervals starting at `start_ms`
pub fn chamber(kind: Chamber, minutes: u64, start_ms: u64, seed: u64) -> Vec<Reading> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..minutes)
        .map(|m| {
            let (co2, mut temperature, humidity) = match kind {
                Chamber::Infested => (
                    640.0 + 0.8 * m as f64 + rng.gen_range(-30.0..30.0),
                    18.0 + rng.gen_range(-0.05..0.05),
                    62.0 + rng.gen_range(-0.3..0.3),
                ),
                Chamber::Healthy | Chamber::FanFault { .. } => (
                    430.0 + rng.gen_range(-2.0..2.0),
                    18.0 + rng.gen_range(-0.05..0.05),
                    62.0 + rng.gen_range(-0.3..0.3),
                ),
            };
            if let Chamber::FanFault { period } = kind {
                // Temperature steps up when the fan stops
                if m % period >= period / 2 {
                    temperature += 0.6;
                }
            }
            Reading::from_millis(start_ms + m * MINUTE_MS, co2, temperature, humidity).unwrap()
        })
        .collect()
}
