//! Random number sources for the simulation
//!
//! Gameplay draws (floor types, widths, coin placement, wind timing) all go
//! through [`RandomSource`] so tests can script the exact sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform floats in `[0, 1)`
pub trait RandomSource: std::fmt::Debug {
    fn next_f32(&mut self) -> f32;

    /// Uniform float in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// +1.0 or -1.0 with equal probability
    fn sign(&mut self) -> f32 {
        if self.next_f32() > 0.5 { 1.0 } else { -1.0 }
    }
}

impl RandomSource for Pcg32 {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Build the default seeded source for a run
pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(Pcg32::seed_from_u64(seed))
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into();
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
