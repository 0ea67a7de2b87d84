//! Static fill templates, grouped in four intensity tiers.

use serde::{Deserialize, Serialize};

/// Abstract instrument slot of a fill entry, mapped to a declared voice at
/// instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillTag {
    Kick,
    Snare,
    Clap,
    ClosedHat,
    OpenHat,
    Crash,
    /// Tom by index, high to low; wraps over the declared toms.
    Tom(u8),
}

/// One note of a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillEntry {
    /// Fraction of the fill window, `[0, 1)`.
    pub position: f64,
    /// Nudge as a fraction of the window.
    pub timing_offset: f64,
    pub velocity_scale: f64,
    pub tag: FillTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    HatLift,
    SnarePickup,
    KickPush,
    SnareEighths,
    TomPair,
    ClapFlam,
    SnareSixteenths,
    TomDescent,
    SnareTomCall,
    TomRoll,
    SnareBuild,
    CrashStabs,
}

#[derive(Debug, Clone, Copy)]
pub struct FillTemplate {
    pub kind: FillKind,
    pub tier: u8,
    /// Fraction of the unit the fill occupies, at its end.
    pub span: f64,
    pub entries: &'static [FillEntry],
}

const fn e(position: f64, velocity_scale: f64, tag: FillTag) -> FillEntry {
    FillEntry {
        position,
        timing_offset: 0.0,
        velocity_scale,
        tag,
    }
}

const fn early(position: f64, timing_offset: f64, velocity_scale: f64, tag: FillTag) -> FillEntry {
    FillEntry {
        position,
        timing_offset,
        velocity_scale,
        tag,
    }
}

use FillTag::*;

pub static TEMPLATES: [FillTemplate; 12] = [
    // Tier 0: ornaments.
    FillTemplate {
        kind: FillKind::HatLift,
        tier: 0,
        span: 0.125,
        entries: &[e(0.0, 0.9, OpenHat)],
    },
    FillTemplate {
        kind: FillKind::SnarePickup,
        tier: 0,
        span: 0.125,
        entries: &[e(0.5, 0.8, Snare)],
    },
    FillTemplate {
        kind: FillKind::KickPush,
        tier: 0,
        span: 0.125,
        entries: &[e(0.5, 0.85, Kick)],
    },
    // Tier 1: one-beat phrases.
    FillTemplate {
        kind: FillKind::SnareEighths,
        tier: 1,
        span: 0.25,
        entries: &[e(0.0, 0.85, Snare), e(0.5, 0.95, Snare)],
    },
    FillTemplate {
        kind: FillKind::TomPair,
        tier: 1,
        span: 0.25,
        entries: &[e(0.0, 0.9, Tom(0)), e(0.5, 0.95, Tom(1))],
    },
    FillTemplate {
        kind: FillKind::ClapFlam,
        tier: 1,
        span: 0.25,
        entries: &[
            early(0.5, -0.07, 0.5, Clap),
            e(0.5, 1.0, Clap),
            e(0.75, 0.8, Snare),
        ],
    },
    // Tier 2: two-beat phrases.
    FillTemplate {
        kind: FillKind::SnareSixteenths,
        tier: 2,
        span: 0.5,
        entries: &[
            e(0.0, 0.7, Snare),
            e(0.125, 0.75, Snare),
            e(0.25, 0.8, Snare),
            e(0.375, 0.85, Snare),
            e(0.5, 0.9, Snare),
            e(0.625, 0.95, Snare),
            e(0.75, 1.0, Snare),
            e(0.875, 1.05, Snare),
        ],
    },
    FillTemplate {
        kind: FillKind::TomDescent,
        tier: 2,
        span: 0.5,
        entries: &[
            e(0.0, 0.9, Tom(0)),
            e(0.25, 0.9, Tom(0)),
            e(0.5, 0.95, Tom(1)),
            e(0.75, 1.0, Tom(2)),
        ],
    },
    FillTemplate {
        kind: FillKind::SnareTomCall,
        tier: 2,
        span: 0.5,
        entries: &[
            e(0.0, 0.9, Snare),
            e(0.25, 0.9, Tom(0)),
            e(0.5, 0.95, Snare),
            e(0.75, 1.0, Tom(2)),
            e(0.75, 0.8, Kick),
        ],
    },
    // Tier 3: full-bar builds.
    FillTemplate {
        kind: FillKind::TomRoll,
        tier: 3,
        span: 0.5,
        entries: &[
            e(0.0, 0.85, Snare),
            e(0.125, 0.85, Tom(0)),
            e(0.25, 0.9, Tom(0)),
            e(0.375, 0.9, Tom(1)),
            e(0.5, 0.95, Tom(1)),
            e(0.625, 1.0, Tom(2)),
            e(0.75, 1.05, Tom(2)),
            e(0.875, 1.1, Snare),
        ],
    },
    FillTemplate {
        kind: FillKind::SnareBuild,
        tier: 3,
        span: 1.0,
        entries: &[
            e(0.0, 0.6, Snare),
            e(0.125, 0.65, Snare),
            e(0.25, 0.7, Snare),
            e(0.375, 0.75, Snare),
            e(0.5, 0.8, Snare),
            e(0.5625, 0.82, Snare),
            e(0.625, 0.85, Snare),
            e(0.6875, 0.88, Snare),
            e(0.75, 0.92, Snare),
            e(0.8125, 0.96, Snare),
            e(0.875, 1.0, Snare),
            e(0.9375, 1.1, Snare),
        ],
    },
    FillTemplate {
        kind: FillKind::CrashStabs,
        tier: 3,
        span: 0.5,
        entries: &[
            e(0.0, 1.0, Crash),
            e(0.0, 1.0, Kick),
            e(0.375, 0.9, Snare),
            e(0.5, 1.0, Crash),
            e(0.5, 1.0, Kick),
            e(0.875, 1.1, Tom(2)),
        ],
    },
];

pub fn template(kind: FillKind) -> &'static FillTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind)
        .unwrap_or(&TEMPLATES[0])
}

pub fn templates_in_tier(tier: u8) -> Vec<&'static FillTemplate> {
    TEMPLATES.iter().filter(|t| t.tier == tier).collect()
}
