//! Common test utilities and data generators for integration tests
//!
//! This module provides:
//! - Seeded chamber data generators (noise, drift, glitches)
//! - Helpers to build reading sequences at fixed sample intervals
//!
//! Every generator takes a seed so that failures reproduce.

#![allow(dead_code)]

use grainguard_core::{Reading, RawSample};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One minute in milliseconds
pub const MINUTE_MS: u64 = 60_000;

/// Sensor behaviour of a simulated chamber node
#[derive(Debug, Clone, Copy)]
pub struct ChamberModel {
    /// Baseline CO2 in ppm
    pub co2_base: f64,
    /// CO2 drift per sample in ppm
    pub co2_drift: f64,
    /// Uniform noise amplitude on CO2
    pub co2_noise: f64,
    /// Baseline temperature in °C
    pub temperature_base: f64,
    /// Uniform noise amplitude on temperature
    pub temperature_noise: f64,
    /// Baseline humidity in %
    pub humidity_base: f64,
    /// Uniform noise amplitude on humidity
    pub humidity_noise: f64,
    /// Probability that a CO2 sample is a glitch
    pub glitch_probability: f64,
}

impl ChamberModel {
    /// Healthy, empty chamber: flat CO2, stable climate
    pub fn quiet() -> Self {
        Self {
            co2_base: 430.0,
            co2_drift: 0.0,
            co2_noise: 2.0,
            temperature_base: 18.0,
            temperature_noise: 0.05,
            humidity_base: 62.0,
            humidity_noise: 0.3,
            glitch_probability: 0.0,
        }
    }

    /// Infested chamber: elevated, rising and jittery CO2
    pub fn infested() -> Self {
        Self {
            co2_base: 650.0,
            co2_drift: 1.5,
            co2_noise: 40.0,
            ..Self::quiet()
        }
    }

    /// Cheap NDIR sensor with occasional glitches
    pub fn glitchy() -> Self {
        Self { glitch_probability: 0.02, ..Self::quiet() }
    }
}

/// Seeded reading generator
pub struct ChamberGenerator {
    rng: StdRng,
    model: ChamberModel,
    interval_ms: u64,
}

impl ChamberGenerator {
    /// Generator sampling once per minute
    pub fn new(model: ChamberModel, seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), model, interval_ms: MINUTE_MS }
    }

    /// Change the sample interval
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude == 0.0 {
            0.0
        } else {
            self.rng.gen_range(-amplitude..amplitude)
        }
    }

    /// Next raw triple for sample number `i`
    pub fn sample(&mut self, i: usize) -> RawSample {
        let m = self.model;
        let mut co2 = m.co2_base + m.co2_drift * i as f64 + self.noise(m.co2_noise);
        if m.glitch_probability > 0.0 && self.rng.gen_bool(m.glitch_probability) {
            co2 += 3000.0;
        }
        RawSample::new(
            co2,
            m.temperature_base + self.noise(m.temperature_noise),
            m.humidity_base + self.noise(m.humidity_noise),
        )
    }

    /// `count` readings starting at `start_ms`
    pub fn readings(&mut self, start_ms: u64, count: usize) -> Vec<Reading> {
        (0..count)
            .map(|i| {
                let s = self.sample(i);
                let ms = start_ms + i as u64 * self.interval_ms;
                Reading::from_millis(ms, s.co2, s.temperature, s.humidity).unwrap()
            })
            .collect()
    }
}

/// Readings at one-minute intervals from explicit channel values
pub fn readings_from(values: &[(f64, f64, f64)]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(co2, t, h))| Reading::from_millis(i as u64 * MINUTE_MS, co2, t, h).unwrap())
        .collect()
}
