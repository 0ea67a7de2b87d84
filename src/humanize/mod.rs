//! Micro-timing and velocity shaping applied to every note candidate.
//!
//! Timing jitter is scaled by the role's timing class; energy pushes notes
//! ahead of the beat (high) or behind it (low). Velocity picks up metric
//! accents, a swell across the unit, a little noise and the section's
//! dynamics offset.

pub mod surprise;
pub mod swing;

pub use surprise::{maybe_surprise, SurpriseContext, SurpriseKind};
pub use swing::apply_swing;

use std::f64::consts::PI;

use crate::event::{NoteCandidate, UnitGrid};
use crate::rng::RngContext;
use crate::voice::TimingClass;

/// Jitter bound for loose roles, in steps.
pub const LOOSE_JITTER: f64 = 0.08;
/// Jitter bound for tight roles: 60 % narrower than loose.
pub const TIGHT_JITTER: f64 = LOOSE_JITTER * 0.4;

const RUSH_MAX: f64 = 0.12;
const DRAG_MAX: f64 = 0.06;

const DOWNBEAT_ACCENT: f64 = 10.0;
const BACKBEAT_ACCENT: f64 = 6.0;
const SWELL: f64 = 4.0;
const VELOCITY_NOISE: f64 = 3.0;

/// The unit-wide inputs to humanization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feel {
    /// 0.0 (laid back) to 1.0 (pushing).
    pub energy: f64,
    /// Section dynamics, added to every velocity.
    pub dynamics_offset: f64,
}

/// Signed timing bias in steps for an energy level; negative is early.
pub fn energy_bias(energy: f64) -> f64 {
    let e = energy.clamp(0.0, 1.0);
    if e > 0.5 {
        -(e - 0.5) * 2.0 * RUSH_MAX
    } else {
        (0.5 - e) * 2.0 * DRAG_MAX
    }
}

pub fn jitter_bound(class: TimingClass) -> f64 {
    match class {
        TimingClass::Tight => TIGHT_JITTER,
        TimingClass::Loose => LOOSE_JITTER,
    }
}

/// Deterministic metric accent for a step.
pub fn metric_accent(grid: &UnitGrid, step: usize) -> f64 {
    if grid.is_downbeat(step) {
        DOWNBEAT_ACCENT
    } else if grid.is_backbeat(step) {
        BACKBEAT_ACCENT
    } else {
        0.0
    }
}

/// Shape one candidate's timing and velocity in place.
pub fn humanize(candidate: &mut NoteCandidate, feel: &Feel, grid: &UnitGrid, rng: &mut RngContext) {
    let step_ticks = grid.step_ticks();
    let jitter = rng.symmetric(jitter_bound(candidate.role.timing_class()));
    let shift = (jitter + energy_bias(feel.energy)) * step_ticks;
    candidate.start += shift.round() as i64;

    let swell = SWELL * (PI * grid.bar_position(candidate.step)).sin();
    let noise = rng.symmetric(VELOCITY_NOISE);
    candidate.velocity += metric_accent(grid, candidate.step) + swell + noise + feel.dynamics_offset;
    candidate.velocity = candidate.velocity.clamp(1.0, 127.0);
}

/// The velocity-only path used when humanization is disabled.
pub fn apply_dynamics(candidate: &mut NoteCandidate, feel: &Feel, grid: &UnitGrid) {
    candidate.velocity += metric_accent(grid, candidate.step) + feel.dynamics_offset;
    candidate.velocity = candidate.velocity.clamp(1.0, 127.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Role;
    use assert_approx_eq::assert_approx_eq;

    fn candidate(role: Role, step: usize) -> NoteCandidate {
        NoteCandidate {
            role,
            pitch: role.default_pitch(),
            start: (step * 240) as i64 + 3840,
            duration: 240,
            velocity: 90.0,
            core: false,
            unit: 1,
            step,
            unit_end: 7680,
        }
    }

    fn grid() -> UnitGrid {
        UnitGrid::new(3840, 16)
    }

    #[test]
    fn tight_is_sixty_percent_narrower() {
        assert_approx_eq!(TIGHT_JITTER, 0.032);
        assert_approx_eq!(jitter_bound(TimingClass::Loose), 0.08);
    }

    #[test]
    fn energy_bias_direction() {
        assert!(energy_bias(1.0) < 0.0);
        assert!(energy_bias(0.0) > 0.0);
        assert_approx_eq!(energy_bias(0.5), 0.0);
        assert_approx_eq!(energy_bias(1.0), -0.12);
        assert_approx_eq!(energy_bias(0.0), 0.06);
    }

    #[test]
    fn timing_stays_within_bounds() {
        let g = grid();
        for seed in 0..200 {
            let mut rng = RngContext::new(seed);
            for (role, bound) in [(Role::Kick, TIGHT_JITTER), (Role::ClosedHat, LOOSE_JITTER)] {
                let mut c = candidate(role, 2);
                let base = c.start;
                humanize(&mut c, &Feel { energy: 0.5, dynamics_offset: 0.0 }, &g, &mut rng);
                let max = (bound * g.step_ticks()).round() as i64 + 1;
                assert!((c.start - base).abs() <= max);
            }
        }
    }

    #[test]
    fn high_energy_rushes_on_average() {
        let g = grid();
        let mut rng = RngContext::new(5);
        let mut total = 0;
        for _ in 0..100 {
            let mut c = candidate(Role::ClosedHat, 6);
            let base = c.start;
            humanize(&mut c, &Feel { energy: 1.0, dynamics_offset: 0.0 }, &g, &mut rng);
            total += c.start - base;
        }
        assert!(total < 0);
    }

    #[test]
    fn downbeats_are_louder_than_offbeats() {
        let g = grid();
        let feel = Feel { energy: 0.5, dynamics_offset: 0.0 };
        let mut rng = RngContext::new(9);
        let mut down = candidate(Role::Kick, 0);
        let mut off = candidate(Role::Kick, 15);
        humanize(&mut down, &feel, &g, &mut rng);
        humanize(&mut off, &feel, &g, &mut rng);
        assert!(down.velocity > off.velocity);
    }

    #[test]
    fn velocity_is_clamped() {
        let g = grid();
        let mut c = candidate(Role::Snare, 4);
        c.velocity = 125.0;
        humanize(&mut c, &Feel { energy: 0.5, dynamics_offset: 8.0 }, &g, &mut RngContext::new(1));
        assert!(c.velocity <= 127.0);
        let mut quiet = candidate(Role::Snare, 3);
        quiet.velocity = 2.0;
        apply_dynamics(&mut quiet, &Feel { energy: 0.5, dynamics_offset: -12.0 }, &g);
        assert_eq!(quiet.velocity, 1.0);
    }
}
