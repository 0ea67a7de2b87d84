//! Call-and-response between concurrent voices.
//!
//! A secondary voice avoids landing on its primary's hits and fills some of
//! the gaps both leave, more eagerly towards the end of a phrase.

use crate::rhythm::{Lane, Pattern, StepSequence};
use crate::rng::RngContext;
use crate::voice::Role;

/// Units per phrase.
pub const PHRASE_UNITS: usize = 4;

const BASE_INVOCATION: f64 = 0.3;
const PHRASE_END_BOOST: f64 = 0.3;
const PHRASE_END_PROGRESS: f64 = 0.75;
const SUPPRESSION: f64 = 0.7;
const RESPONSE: f64 = 0.2;

/// (primary, secondary) pairs, evaluated in this order.
pub const INTERACTION_PAIRS: [(Role, Role); 4] = [
    (Role::Snare, Role::ClosedHat),
    (Role::Kick, Role::OpenHat),
    (Role::Snare, Role::Shaker),
    (Role::Kick, Role::Cowbell),
];

/// Position of `unit` within its phrase, in `[0, 1)`.
pub fn phrase_progress(unit: usize) -> f64 {
    (unit % PHRASE_UNITS) as f64 / PHRASE_UNITS as f64
}

pub fn invocation_probability(progress: f64) -> f64 {
    if progress >= PHRASE_END_PROGRESS {
        BASE_INVOCATION + PHRASE_END_BOOST
    } else {
        BASE_INVOCATION
    }
}

/// Adjust `secondary` against `primary`. The secondary's core hits are
/// protected. Returns whether the interaction was invoked.
pub fn derive_complementary(
    primary: &StepSequence,
    secondary: &mut Lane,
    progress: f64,
    rng: &mut RngContext,
) -> bool {
    if !rng.chance(invocation_probability(progress)) {
        return false;
    }
    let steps = secondary.steps().min(primary.len());
    for step in 0..steps {
        let p = primary.get(step);
        let s = secondary.hits.get(step);
        if p && s {
            if !secondary.is_core(step) && rng.chance(SUPPRESSION) {
                secondary.clear_variable(step);
            }
        } else if !p && !s && rng.chance(RESPONSE) {
            secondary.add_hit(step);
        }
    }
    true
}

/// Run every pair whose voices both have lanes in `pattern`.
pub fn apply_interactions(pattern: &mut Pattern, unit: usize, rng: &mut RngContext) {
    let progress = phrase_progress(unit);
    for (primary, secondary) in INTERACTION_PAIRS {
        let Some(primary_hits) = pattern.lane(primary).map(|l| l.hits.clone()) else {
            continue;
        };
        let Some(lane) = pattern.existing_lane_mut(secondary) else {
            continue;
        };
        if derive_complementary(&primary_hits, lane, progress, rng) {
            tracing::debug!("unit {unit}: {secondary} answers {primary}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_wraps_per_phrase() {
        assert_eq!(phrase_progress(0), 0.0);
        assert_eq!(phrase_progress(3), 0.75);
        assert_eq!(phrase_progress(4), 0.0);
        assert_eq!(invocation_probability(0.75), 0.6);
        assert_eq!(invocation_probability(0.5), 0.3);
    }

    #[test]
    fn core_hits_are_never_suppressed() {
        let primary = StepSequence::from_hits(16, &[0, 4, 8, 12]);
        for seed in 0..100 {
            let mut hat = Lane::new(16);
            for s in [0, 4, 8, 12] {
                hat.force_core(s);
            }
            derive_complementary(&primary, &mut hat, 0.75, &mut RngContext::new(seed));
            for s in [0, 4, 8, 12] {
                assert!(hat.hits.get(s));
            }
        }
    }

    #[test]
    fn invoked_interaction_suppresses_coincident_hits() {
        let primary = StepSequence::from_hits(16, &[4, 12]);
        let mut removed = 0;
        let mut invoked = 0;
        for seed in 0..200 {
            let mut hat = Lane::new(16);
            hat.add_hit(4);
            hat.add_hit(12);
            if derive_complementary(&primary, &mut hat, 0.0, &mut RngContext::new(seed)) {
                invoked += 1;
                removed += 2 - [4, 12].iter().filter(|&&s| hat.hits.get(s)).count();
            }
        }
        assert!(invoked > 30 && invoked < 100);
        assert!(removed as f64 > invoked as f64);
    }

    #[test]
    fn responses_only_land_on_shared_rests() {
        let primary = StepSequence::from_hits(8, &[0, 2, 4, 6]);
        for seed in 0..50 {
            let mut shaker = Lane::new(8);
            derive_complementary(&primary, &mut shaker, 0.9, &mut RngContext::new(seed));
            for s in shaker.hits.hits() {
                assert!(s % 2 == 1);
            }
        }
    }

    #[test]
    fn missing_lanes_skip_pairs() {
        let mut p = Pattern::new(16);
        p.lane_mut(Role::Kick).force_core(0);
        let before = p.clone();
        apply_interactions(&mut p, 3, &mut RngContext::new(1));
        assert_eq!(p, before);
    }
}
