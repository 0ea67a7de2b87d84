//! Per-unit tension: how close the arrangement is to a climax.
//!
//! The raw blend of position, complexity and density delta is divided by the
//! largest raw value the section plan can produce, so the strongest unit of
//! any plan reaches 1.0 when its predecessor was sparse.

use super::{section_for, SectionContext, SectionMode};

const POSITION_WEIGHT: f64 = 0.45;
const COMPLEXITY_WEIGHT: f64 = 0.35;
const DELTA_WEIGHT: f64 = 0.2;

/// Lower bound on the normalising peak for very short plans.
const PEAK_FLOOR: f64 = 0.6;

/// Tracks the previous unit's realized density so tension can react to
/// density changes.
#[derive(Debug, Clone)]
pub struct TensionTracker {
    previous_density: Option<f64>,
    peak: f64,
}

impl TensionTracker {
    /// A tracker scaled to the section plan of `total` units in `mode`.
    pub fn new(total: usize, mode: SectionMode) -> Self {
        let peak = (0..total)
            .map(|unit| {
                let section = section_for(unit, total, mode);
                let delta = if unit == 0 { 0.0 } else { target_density(&section) };
                raw_tension(position(unit, total), &section, delta)
            })
            .fold(PEAK_FLOOR, f64::max);
        Self {
            previous_density: None,
            peak,
        }
    }

    /// Tension in `[0, 1]` for `unit` of `total`.
    pub fn tension_for(&self, unit: usize, total: usize, section: &SectionContext) -> f64 {
        let delta = match self.previous_density {
            Some(prev) => (target_density(section) - prev).clamp(-1.0, 1.0),
            None => 0.0,
        };
        (raw_tension(position(unit, total), section, delta) / self.peak).clamp(0.0, 1.0)
    }

    /// Record the density a unit actually ended up with.
    pub fn record_realized(&mut self, density: f64) {
        self.previous_density = Some(density.clamp(0.0, 1.0));
    }
}

fn position(unit: usize, total: usize) -> f64 {
    if total <= 1 {
        0.0
    } else {
        unit.min(total - 1) as f64 / (total - 1) as f64
    }
}

fn target_density(section: &SectionContext) -> f64 {
    (0.5 * section.density_multiplier).clamp(0.0, 1.0)
}

fn raw_tension(position: f64, section: &SectionContext, delta: f64) -> f64 {
    POSITION_WEIGHT * position + COMPLEXITY_WEIGHT * section.complexity + DELTA_WEIGHT * (delta + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionKind;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn first_unit_uses_zero_delta() {
        let t = TensionTracker::new(8, SectionMode::Auto);
        let verse = SectionKind::Verse.context();
        assert_approx_eq!(t.tension_for(0, 8, &verse), (0.35 * 0.4 + 0.1) / t.peak);
    }

    #[test]
    fn density_drop_raises_tension() {
        let chorus = SectionKind::Chorus.context();
        let mut quiet = TensionTracker::new(8, SectionMode::Auto);
        quiet.record_realized(0.1);
        let mut busy = TensionTracker::new(8, SectionMode::Auto);
        busy.record_realized(0.9);
        assert!(quiet.tension_for(4, 8, &chorus) > busy.tension_for(4, 8, &chorus));
    }

    #[test]
    fn tension_is_bounded() {
        for total in 1..40 {
            let mut tracker = TensionTracker::new(total, SectionMode::Auto);
            for unit in 0..total {
                let section = section_for(unit, total, SectionMode::Auto);
                let t = tracker.tension_for(unit, total, &section);
                assert!((0.0..=1.0).contains(&t));
                tracker.record_realized((unit % 7) as f64 / 6.0);
            }
        }
    }

    #[test]
    fn position_pushes_tension_up() {
        let t = TensionTracker::new(16, SectionMode::Manual(SectionKind::Bridge));
        let bridge = SectionKind::Bridge.context();
        assert!(t.tension_for(15, 16, &bridge) > t.tension_for(0, 16, &bridge));
        assert_approx_eq!(t.tension_for(15, 16, &bridge) - t.tension_for(0, 16, &bridge), 0.45 / t.peak);
    }

    #[test]
    fn climax_reaches_the_top_tier() {
        for total in [8, 16, 32] {
            let mut tracker = TensionTracker::new(total, SectionMode::Auto);
            let mut highest: f64 = 0.0;
            for unit in 0..total {
                let section = section_for(unit, total, SectionMode::Auto);
                highest = highest.max(tracker.tension_for(unit, total, &section));
                tracker.record_realized(0.3);
            }
            assert!(highest > 0.85, "{total} units peak at {highest}");
        }
    }

    #[test]
    fn opening_stays_low() {
        let t = TensionTracker::new(16, SectionMode::Auto);
        let intro = section_for(0, 16, SectionMode::Auto);
        assert!(t.tension_for(0, 16, &intro) < 0.3);
    }

    #[test]
    fn single_unit_is_not_a_climax() {
        let t = TensionTracker::new(1, SectionMode::Auto);
        let verse = section_for(0, 1, SectionMode::Auto);
        assert_approx_eq!(t.peak, PEAK_FLOOR);
        assert!(t.tension_for(0, 1, &verse) < 0.85);
    }
}
