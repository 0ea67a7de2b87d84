//! Swing: delay every off-beat sixteenth by a fraction of a step.

use crate::event::{NoteCandidate, UnitGrid};

/// Largest accepted swing amount, in steps.
pub const MAX_SWING: f64 = 0.5;

/// Whether `step` sits on an odd sixteenth. Grids coarser than sixteenths
/// swing their odd steps.
pub fn is_swung_step(grid: &UnitGrid, step: usize) -> bool {
    let per_sixteenth = (grid.steps() / 16).max(1);
    step % per_sixteenth == 0 && (step / per_sixteenth) % 2 == 1
}

/// Delay an odd-sixteenth candidate by `amount` sixteenths.
pub fn apply_swing(candidate: &mut NoteCandidate, amount: f64, grid: &UnitGrid) {
    if amount <= 0.0 || !is_swung_step(grid, candidate.step) {
        return;
    }
    let per_sixteenth = (grid.steps() / 16).max(1) as f64;
    let delay = amount.min(MAX_SWING) * grid.step_ticks() * per_sixteenth;
    candidate.start += delay.round() as i64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Role;

    fn candidate(step: usize) -> NoteCandidate {
        NoteCandidate {
            role: Role::ClosedHat,
            pitch: 42,
            start: step as i64 * 240,
            duration: 240,
            velocity: 80.0,
            core: false,
            unit: 0,
            step,
            unit_end: 3840,
        }
    }

    #[test]
    fn only_odd_sixteenths_move() {
        let grid = UnitGrid::new(3840, 16);
        let mut even = candidate(2);
        let mut odd = candidate(3);
        apply_swing(&mut even, 0.2, &grid);
        apply_swing(&mut odd, 0.2, &grid);
        assert_eq!(even.start, 480);
        assert_eq!(odd.start, 720 + 48);
    }

    #[test]
    fn thirty_second_grid_swings_sixteenths_only() {
        let grid = UnitGrid::new(3840, 32);
        assert!(is_swung_step(&grid, 2));
        assert!(!is_swung_step(&grid, 3));
        assert!(!is_swung_step(&grid, 4));
    }

    #[test]
    fn zero_swing_is_identity() {
        let grid = UnitGrid::new(3840, 16);
        let mut c = candidate(5);
        apply_swing(&mut c, 0.0, &grid);
        assert_eq!(c.start, 1200);
    }

    #[test]
    fn amount_is_capped() {
        let grid = UnitGrid::new(3840, 16);
        let mut c = candidate(1);
        apply_swing(&mut c, 3.0, &grid);
        assert_eq!(c.start, 240 + 120);
    }
}
