//! Randomness sources for exploration and weight initialization

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_uniform() * len as f64) as usize).min(len - 1)
    }
}

impl RandomSource for StdRng {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Replays a fixed sequence of samples, wrapping around at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted sequence must not be empty");
        Self { values, cursor: 0 }
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_wraps() {
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_uniform(), 0.1);
        assert_eq!(rng.next_uniform(), 0.9);
        assert_eq!(rng.next_uniform(), 0.1);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5, 0.9999]);
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 2);
        assert_eq!(rng.next_index(4), 3);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = seeded(12345);
        let mut b = seeded(12345);
        for _ in 0..10 {
            let x = a.next_uniform();
            assert_eq!(x, b.next_uniform());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
