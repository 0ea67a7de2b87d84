//! Step grid geometry for one repetition unit.

/// Maps step indices of a unit onto tick offsets and metric positions.
///
/// Offsets are computed as `step * unit_ticks / steps`, so the grid stays
/// valid even when a unit is shorter than its step count in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGrid {
    unit_ticks: u64,
    steps: usize,
}

impl UnitGrid {
    pub fn new(unit_ticks: u64, steps: usize) -> Self {
        Self {
            unit_ticks,
            steps: steps.max(1),
        }
    }

    pub fn unit_ticks(&self) -> u64 {
        self.unit_ticks
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Absolute tick where unit `unit` begins.
    pub fn unit_start(&self, unit: usize) -> u64 {
        unit as u64 * self.unit_ticks
    }

    /// Tick offset of `step` from the unit start.
    pub fn step_offset(&self, step: usize) -> u64 {
        step as u64 * self.unit_ticks / self.steps as u64
    }

    /// Length of one step in (fractional) ticks.
    pub fn step_ticks(&self) -> f64 {
        self.unit_ticks as f64 / self.steps as f64
    }

    /// Steps per beat, assuming four beats per unit.
    pub fn steps_per_beat(&self) -> usize {
        (self.steps / 4).max(1)
    }

    /// Beats 1 and 3.
    pub fn is_downbeat(&self, step: usize) -> bool {
        let spb = self.steps_per_beat();
        step % spb == 0 && (step / spb) % 2 == 0
    }

    /// Beats 2 and 4.
    pub fn is_backbeat(&self, step: usize) -> bool {
        let spb = self.steps_per_beat();
        step % spb == 0 && (step / spb) % 2 == 1
    }

    /// Position within the unit in `[0, 1)`.
    pub fn bar_position(&self, step: usize) -> f64 {
        step as f64 / self.steps as f64
    }

    /// Map a step of the 16-step reference grid onto this grid.
    pub fn from_reference(&self, reference_step: usize) -> usize {
        (reference_step * self.steps / 16).min(self.steps - 1)
    }
}
