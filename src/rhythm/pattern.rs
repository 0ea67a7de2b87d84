//! Per-voice content for one repetition unit.

use std::collections::BTreeMap;

use super::StepSequence;
use crate::voice::Role;

/// One voice's hits for a unit, with the core positions that must survive.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub hits: StepSequence,
    pub core: StepSequence,
    /// Hits played as ghost notes.
    pub ghosts: StepSequence,
    /// Scale degree per step, indexing into the voice's pitch set.
    pub degrees: Vec<i8>,
    /// Note length per step, in steps.
    pub lengths: Vec<u8>,
}

impl Lane {
    pub fn new(steps: usize) -> Self {
        Self {
            hits: StepSequence::rests(steps),
            core: StepSequence::rests(steps),
            ghosts: StepSequence::rests(steps),
            degrees: vec![0; steps],
            lengths: vec![1; steps],
        }
    }

    pub fn steps(&self) -> usize {
        self.hits.len()
    }

    pub fn is_core(&self, step: usize) -> bool {
        self.core.get(step)
    }

    /// Mark a step as a core hit.
    pub fn force_core(&mut self, step: usize) {
        self.core.set(step, true);
        self.hits.set(step, true);
        self.ghosts.set(step, false);
    }

    /// A full-velocity hit.
    pub fn add_hit(&mut self, step: usize) {
        self.hits.set(step, true);
        self.ghosts.set(step, false);
    }

    /// A quiet hit on a rest. Existing hits are left alone.
    pub fn add_ghost(&mut self, step: usize) {
        if !self.hits.get(step) {
            self.hits.set(step, true);
            self.ghosts.set(step, true);
        }
    }

    pub fn is_ghost(&self, step: usize) -> bool {
        self.ghosts.get(step)
    }

    /// Clear a variable hit. Core hits stay; returns whether the step is now a rest.
    pub fn clear_variable(&mut self, step: usize) -> bool {
        if self.is_core(step) {
            return false;
        }
        self.hits.set(step, false);
        self.ghosts.set(step, false);
        true
    }

    /// Clear every variable hit.
    pub fn clear_all_variable(&mut self) {
        for step in 0..self.steps() {
            self.clear_variable(step);
        }
    }

    /// Re-assert every core position.
    pub fn enforce_core(&mut self) {
        let core = self.core.clone();
        self.hits.union_with(&core);
    }

    /// Copy `other`'s hits onto rests of this lane. Copied hits are never core.
    pub fn merge_variable(&mut self, other: &Lane) {
        for step in other.hits.hits() {
            if step < self.steps() && !self.hits.get(step) {
                self.hits.set(step, true);
                self.ghosts.set(step, other.is_ghost(step));
                self.lengths[step] = other.lengths[step];
            }
        }
    }

    /// Hits that are not core.
    pub fn variable_hits(&self) -> Vec<usize> {
        self.hits
            .hits()
            .into_iter()
            .filter(|&s| !self.is_core(s))
            .collect()
    }
}

/// Every voice lane of one unit, keyed by role in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    steps: usize,
    lanes: BTreeMap<Role, Lane>,
}

impl Pattern {
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            lanes: BTreeMap::new(),
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn lane(&self, role: Role) -> Option<&Lane> {
        self.lanes.get(&role)
    }

    /// The lane for `role`, created empty on first use.
    pub fn lane_mut(&mut self, role: Role) -> &mut Lane {
        let steps = self.steps;
        self.lanes.entry(role).or_insert_with(|| Lane::new(steps))
    }

    pub fn existing_lane_mut(&mut self, role: Role) -> Option<&mut Lane> {
        self.lanes.get_mut(&role)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.lanes.keys().copied().collect()
    }

    pub fn lanes(&self) -> impl Iterator<Item = (Role, &Lane)> {
        self.lanes.iter().map(|(&r, l)| (r, l))
    }

    /// Remove and return the lane for `role`.
    pub fn take_lane(&mut self, role: Role) -> Option<Lane> {
        self.lanes.remove(&role)
    }

    pub fn enforce_core(&mut self) {
        for lane in self.lanes.values_mut() {
            lane.enforce_core();
        }
    }

    /// Hits over all slots of all lanes.
    pub fn density(&self) -> f64 {
        let slots = self.steps * self.lanes.len();
        if slots == 0 {
            return 0.0;
        }
        let hits: usize = self.lanes.values().map(|l| l.hits.hit_count()).sum();
        hits as f64 / slots as f64
    }
}
