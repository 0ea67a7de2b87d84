//! Euclidean rhythms: K pulses spread as evenly as possible over N steps.

use super::StepSequence;
use crate::error::{GrooveError, Result};

/// Build the Euclidean pattern for `(steps, pulses, rotation)`.
///
/// Pulse `i` lands on `⌈i·N/K⌉`, then the whole pattern is rotated `rotation`
/// steps later (mod N). Deterministic: identical arguments always give the
/// same sequence.
pub fn euclid(steps: usize, pulses: usize, rotation: usize) -> Result<StepSequence> {
    if steps == 0 {
        return Err(GrooveError::invalid("euclid: steps must be positive"));
    }
    if pulses > steps {
        return Err(GrooveError::invalid(format!(
            "euclid: {pulses} pulses do not fit in {steps} steps"
        )));
    }
    let mut seq = StepSequence::rests(steps);
    for i in 0..pulses {
        seq.set((i * steps).div_ceil(pulses), true);
    }
    Ok(seq.rotated(rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_on_sixteen() {
        assert_eq!(euclid(16, 4, 0).unwrap().hits(), vec![0, 4, 8, 12]);
    }

    #[test]
    fn three_on_eight() {
        assert_eq!(euclid(8, 3, 0).unwrap().hits(), vec![0, 3, 6]);
    }

    #[test]
    fn five_on_eight_is_cinquillo() {
        assert_eq!(euclid(8, 5, 0).unwrap().hits(), vec![0, 2, 4, 5, 7]);
    }

    #[test]
    fn zero_pulses_all_rests() {
        let seq = euclid(12, 0, 5).unwrap();
        assert_eq!(seq.len(), 12);
        assert_eq!(seq.hit_count(), 0);
    }

    #[test]
    fn full_pulses_all_hits() {
        assert_eq!(euclid(7, 7, 3).unwrap().hit_count(), 7);
    }

    #[test]
    fn rotation_wraps_modulo_steps() {
        assert_eq!(euclid(8, 3, 11).unwrap(), euclid(8, 3, 3).unwrap());
    }

    #[test]
    fn invalid_parameters() {
        assert!(matches!(euclid(0, 0, 0), Err(GrooveError::InvalidParameter(_))));
        assert!(matches!(euclid(4, 5, 0), Err(GrooveError::InvalidParameter(_))));
    }

    #[test]
    fn length_pulses_rotation_hold_for_every_input() {
        for n in 1..=32 {
            for k in 0..=n {
                let base = euclid(n, k, 0).unwrap();
                assert_eq!(base.len(), n);
                assert_eq!(base.hit_count(), k, "n={n} k={k}");
                for r in 0..(2 * n) {
                    assert_eq!(euclid(n, k, r).unwrap(), base.rotated(r));
                }
            }
        }
    }
}
