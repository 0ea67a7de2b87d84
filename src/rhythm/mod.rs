//! Step sequences, the hit/rest skeleton every voice is built on.
//!
//! [`euclid`] builds evenly spread patterns; [`Lane`] and [`Pattern`] hold a
//! unit's per-voice hits together with the core positions that must survive.

pub mod euclid;
pub mod pattern;

use std::fmt;

pub use euclid::euclid;
pub use pattern::{Lane, Pattern};

/// A fixed-length sequence of hits and rests, one slot per grid step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepSequence {
    steps: Vec<bool>,
}

impl StepSequence {
    /// All rests.
    pub fn rests(len: usize) -> Self {
        Self {
            steps: vec![false; len],
        }
    }

    /// Hits at the given indices; out-of-range indices are ignored.
    pub fn from_hits(len: usize, hits: &[usize]) -> Self {
        let mut seq = Self::rests(len);
        for &i in hits {
            seq.set(i, true);
        }
        seq
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> bool {
        self.steps.get(index).copied().unwrap_or(false)
    }

    /// Set a slot. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, hit: bool) {
        if let Some(slot) = self.steps.get_mut(index) {
            *slot = hit;
        }
    }

    pub fn hit_count(&self) -> usize {
        self.steps.iter().filter(|&&h| h).count()
    }

    /// Indices of every hit, ascending.
    pub fn hits(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(i, &h)| h.then_some(i))
            .collect()
    }

    /// Circular rotation moving every hit `by` steps later.
    pub fn rotated(&self, by: usize) -> Self {
        let n = self.steps.len();
        if n == 0 {
            return self.clone();
        }
        let by = by % n;
        let mut steps = vec![false; n];
        for (i, &h) in self.steps.iter().enumerate() {
            steps[(i + by) % n] = h;
        }
        Self { steps }
    }

    /// Union of hits; lengths must match, extra slots of `other` are ignored.
    pub fn union_with(&mut self, other: &StepSequence) {
        for (slot, &h) in self.steps.iter_mut().zip(other.steps.iter()) {
            *slot |= h;
        }
    }

    /// Fraction of slots that are hits.
    pub fn density(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.hit_count() as f64 / self.steps.len() as f64
    }
}

impl fmt::Display for StepSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &h in &self.steps {
            f.write_str(if h { "x" } else { "." })?;
        }
        Ok(())
    }
}
