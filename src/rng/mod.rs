//! Seeded randomness shared by every generation stage.
//!
//! A session owns exactly one [`RngContext`]. Every Bernoulli trial, jitter
//! draw, and template choice goes through it in a fixed order, so identical
//! seeds reproduce identical event lists.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single deterministic random source for a session.
#[derive(Debug, Clone)]
pub struct RngContext {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RngContext {
    /// Create a context seeded once for the whole session.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this context was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One Bernoulli trial. Probabilities outside [0, 1] are clamped.
    ///
    /// Always consumes exactly one draw, even for 0.0 and 1.0, so the draw
    /// order does not depend on the probability values.
    pub fn chance(&mut self, probability: f64) -> bool {
        let p = probability.clamp(0.0, 1.0);
        self.rng.gen::<f64>() < p
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform float in `[-bound, bound]`.
    pub fn symmetric(&mut self, bound: f64) -> f64 {
        (self.rng.gen::<f64>() * 2.0 - 1.0) * bound
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Uniform integer in `low..=high`. Returns `low` when the range is empty.
    pub fn between(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}
