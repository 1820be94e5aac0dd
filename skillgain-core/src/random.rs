//! Uniform random source consumed by the gain engine.
//!
//! Every chance gate draws exactly one value in `[0, 1)`. Production code
//! hands in any `rand` generator; tests use [`FixedRoll`] or
//! [`ScriptedRolls`] to pin the outcome and count draws.

use std::collections::VecDeque;

use rand::Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub f64);

impl RandomSource for FixedRoll {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of draws, then repeats a fallback. Counts every draw.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    queue: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRolls {
    /// Replay `rolls` in order, then return `fallback` forever.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            fallback,
            draws: 0,
        }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.draws += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
