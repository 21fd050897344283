//! Injectable randomness for enemy fire and arrow colors
//!
//! The engine draws through [`RandomSource`] so tests can replace the PCG
//! stream with a scripted sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws used by the simulation
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len`; `len` must be non-zero
    fn next_index(&mut self, len: usize) -> usize;
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Seeded generator for a play session
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of unit draws, cycling when exhausted
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty());
        Self { values, cursor: 0 }
    }

    /// Never below any shoot chance; picks the last palette entry
    pub(crate) fn quiet() -> Self {
        Self::new(vec![0.999])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }

    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }
}
