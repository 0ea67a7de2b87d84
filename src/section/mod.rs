//! Song sections: which part of the arrangement a unit belongs to, and how
//! that part scales density, dynamics and fill appetite.
//!
//! In [`SectionMode::Auto`] the unit range is split into intro, body thirds
//! (verse/chorus/bridge) and outro. Sequences shorter than five units use a
//! fixed fallback table so every unit still gets a section.

pub mod tension;

pub use tension::TensionTracker;

use serde::{Deserialize, Serialize};

use crate::rhythm::Pattern;
use crate::rng::RngContext;

/// Units reserved for the intro and for the outro in auto mode.
const EDGE_UNITS: usize = 2;

/// Thinning/ghosting strength per unit of density multiplier away from 1.
const GHOST_RATE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Intro,
    Verse,
    Chorus,
    Bridge,
    Outro,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Intro,
        SectionKind::Verse,
        SectionKind::Chorus,
        SectionKind::Bridge,
        SectionKind::Outro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Intro => "intro",
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
            SectionKind::Outro => "outro",
        }
    }

    /// The modulation parameters for this kind.
    pub fn context(self) -> SectionContext {
        let (density_multiplier, dynamics_offset, fill_probability, complexity) = match self {
            SectionKind::Intro => (0.6, -12.0, 0.15, 0.2),
            SectionKind::Verse => (1.0, 0.0, 0.25, 0.4),
            SectionKind::Chorus => (1.25, 8.0, 0.35, 0.75),
            SectionKind::Bridge => (0.85, -4.0, 0.45, 0.6),
            SectionKind::Outro => (0.7, -8.0, 0.5, 0.3),
        };
        SectionContext {
            kind: self,
            density_multiplier,
            dynamics_offset,
            fill_probability,
            complexity,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-unit modulation derived from the section kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionContext {
    pub kind: SectionKind,
    pub density_multiplier: f64,
    /// Added to every velocity in the unit.
    pub dynamics_offset: f64,
    pub fill_probability: f64,
    /// 0.0 (plain) to 1.0 (busy).
    pub complexity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionMode {
    /// Derive sections from the unit's position in the sequence.
    #[default]
    Auto,
    /// Use one section kind for every unit.
    Manual(SectionKind),
}

/// A contiguous run of units sharing one section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub kind: SectionKind,
    pub start: usize,
    /// Exclusive.
    pub end: usize,
}

impl SectionRange {
    pub fn contains(&self, unit: usize) -> bool {
        (self.start..self.end).contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Section ranges covering `0..total` without gaps or overlap.
pub fn section_plan(total: usize, mode: SectionMode) -> Vec<SectionRange> {
    if total == 0 {
        return Vec::new();
    }
    if let SectionMode::Manual(kind) = mode {
        return vec![SectionRange {
            kind,
            start: 0,
            end: total,
        }];
    }
    let kinds: &[SectionKind] = match total {
        1 => &[SectionKind::Verse],
        2 => &[SectionKind::Verse, SectionKind::Chorus],
        3 => &[SectionKind::Intro, SectionKind::Chorus, SectionKind::Outro],
        4 => &[
            SectionKind::Intro,
            SectionKind::Verse,
            SectionKind::Chorus,
            SectionKind::Outro,
        ],
        _ => return auto_plan(total),
    };
    kinds
        .iter()
        .enumerate()
        .map(|(i, &kind)| SectionRange {
            kind,
            start: i,
            end: i + 1,
        })
        .collect()
}

fn auto_plan(total: usize) -> Vec<SectionRange> {
    let body_start = EDGE_UNITS;
    let body_end = total - EDGE_UNITS;
    let body = body_end - body_start;
    let cut1 = body_start + body.div_ceil(3);
    let cut2 = body_start + (2 * body).div_ceil(3);
    [
        (SectionKind::Intro, 0, body_start),
        (SectionKind::Verse, body_start, cut1),
        (SectionKind::Chorus, cut1, cut2),
        (SectionKind::Bridge, cut2, body_end),
        (SectionKind::Outro, body_end, total),
    ]
    .into_iter()
    .map(|(kind, start, end)| SectionRange { kind, start, end })
    .filter(|r| !r.is_empty())
    .collect()
}

/// The section context for one unit.
pub fn section_for(unit: usize, total: usize, mode: SectionMode) -> SectionContext {
    section_plan(total, mode)
        .into_iter()
        .find(|r| r.contains(unit))
        .map(|r| r.kind)
        .unwrap_or(SectionKind::Verse)
        .context()
}

/// Whether the next unit starts a different section.
pub fn is_last_before_change(unit: usize, total: usize, mode: SectionMode) -> bool {
    section_plan(total, mode)
        .iter()
        .any(|r| r.end == unit + 1 && r.end < total)
}

/// Thin variable hits below a 1.0 multiplier; add ghost notes on rests of
/// ghost-capable roles above it.
pub fn shape_density(pattern: &mut Pattern, section: &SectionContext, rng: &mut RngContext) {
    let m = section.density_multiplier;
    if (m - 1.0).abs() < f64::EPSILON {
        return;
    }
    for role in pattern.roles() {
        let Some(lane) = pattern.existing_lane_mut(role) else {
            continue;
        };
        if m < 1.0 {
            let drop = 1.0 - m;
            for step in lane.variable_hits() {
                if rng.chance(drop) {
                    lane.clear_variable(step);
                }
            }
        } else if role.takes_ghosts() {
            let ghost = ((m - 1.0) * GHOST_RATE).min(1.0);
            for step in 0..lane.steps() {
                if !lane.hits.get(step) && rng.chance(ghost) {
                    lane.add_ghost(step);
                }
            }
        }
    }
}
