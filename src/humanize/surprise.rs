//! Occasional deliberate "mistakes": dropped notes, displaced accents,
//! ghost notes, alternate articulations and flams.

use serde::{Deserialize, Serialize};

use crate::event::{NoteCandidate, UnitGrid};
use crate::rng::RngContext;
use crate::voice::{ConstraintTable, VoiceSet};

pub const BASE_PROBABILITY: f64 = 0.05;
const DOWNBEAT_SCALE: f64 = 0.4;
const MIDDLE_SCALE: f64 = 1.3;

const ACCENT_BOOST: f64 = 15.0;
const GHOST_LEAD: f64 = 0.5;
const GHOST_SCALE: f64 = 0.35;
const FLAM_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurpriseKind {
    Drop,
    DisplacedAccent,
    GhostNote,
    VoicedVariation,
    Flam,
}

impl SurpriseKind {
    pub const ALL: [SurpriseKind; 5] = [
        SurpriseKind::Drop,
        SurpriseKind::DisplacedAccent,
        SurpriseKind::GhostNote,
        SurpriseKind::VoicedVariation,
        SurpriseKind::Flam,
    ];
}

/// What a surprise needs to know about its surroundings.
pub struct SurpriseContext<'a> {
    pub enabled: &'a [SurpriseKind],
    /// Position of the unit within the whole sequence, `[0, 1]`.
    pub structure_position: f64,
    pub grid: &'a UnitGrid,
    pub voices: &'a VoiceSet,
    pub constraints: &'a ConstraintTable,
}

/// Chance that a non-core candidate is surprised.
pub fn surprise_probability(is_downbeat: bool, structure_position: f64) -> f64 {
    let mut p = BASE_PROBABILITY;
    if is_downbeat {
        p *= DOWNBEAT_SCALE;
    }
    if (0.3..=0.7).contains(&structure_position) {
        p *= MIDDLE_SCALE;
    }
    p
}

/// Maybe replace `candidate` with a surprised version of it.
///
/// Core candidates and an empty kind list pass through without consuming
/// randomness. The result holds zero, one or two candidates.
pub fn maybe_surprise(
    candidate: NoteCandidate,
    ctx: &SurpriseContext<'_>,
    rng: &mut RngContext,
) -> Vec<NoteCandidate> {
    if candidate.core || ctx.enabled.is_empty() {
        return vec![candidate];
    }
    let p = surprise_probability(ctx.grid.is_downbeat(candidate.step), ctx.structure_position);
    if !rng.chance(p) {
        return vec![candidate];
    }
    let Some(&kind) = rng.pick(ctx.enabled) else {
        return vec![candidate];
    };
    tracing::debug!(
        "surprise {kind:?} on {} at tick {}",
        candidate.role,
        candidate.start_tick()
    );
    let step_ticks = ctx.grid.step_ticks();
    match kind {
        SurpriseKind::Drop => Vec::new(),
        SurpriseKind::DisplacedAccent => {
            let magnitude = (0.25 + rng.unit() * 0.25) * step_ticks;
            let sign = if rng.chance(0.5) { 1.0 } else { -1.0 };
            let mut c = candidate;
            c.start += (sign * magnitude).round() as i64;
            c.velocity += ACCENT_BOOST;
            vec![c]
        }
        SurpriseKind::GhostNote => {
            let mut ghost = candidate.clone();
            ghost.start -= (GHOST_LEAD * step_ticks).round() as i64;
            ghost.velocity *= GHOST_SCALE;
            vec![ghost, candidate]
        }
        SurpriseKind::VoicedVariation => {
            let mut c = candidate;
            c.pitch = ctx.voices.resolve_or_substitute(c.role).alternate_pitch(c.pitch);
            vec![c]
        }
        SurpriseKind::Flam => {
            let mut grace = candidate.clone();
            grace.start -= ctx.constraints.min_interval(candidate.role) as i64;
            grace.velocity *= FLAM_SCALE;
            vec![grace, candidate]
        }
    }
}
