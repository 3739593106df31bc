//! Random number sources for session draws

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform integers
pub trait RandomSource {
    /// Uniform integer in `lo..=hi` (both ends inclusive)
    fn between(&mut self, lo: i32, hi: i32) -> i32;
}

/// Seeded PCG generator
#[derive(Debug, Clone)]
pub struct PcgRandom {
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgRandom {
    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed sequence of values
///
/// Each value is clamped into the requested range. Once the script runs out
/// every draw returns `lo`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Queue more values
    pub fn extend(&mut self, values: impl IntoIterator<Item = i32>) {
        self.values.extend(values);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        match self.values.pop_front() {
            Some(v) => v.clamp(lo, hi.max(lo)),
            None => lo,
        }
    }
}
