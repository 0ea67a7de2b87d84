//! Fill selection and instantiation.
//!
//! Tension chooses a tier; a template is picked uniformly inside it (never
//! the previous one when there is a choice) and mapped onto the declared
//! voices.

pub mod library;

pub use library::{template, templates_in_tier, FillEntry, FillKind, FillTag, FillTemplate};

use crate::rng::RngContext;
use crate::section::SectionContext;
use crate::voice::{Role, VoiceSet};

/// Extra fill chance on the last unit of a section.
pub const SECTION_END_BOOST: f64 = 0.35;
/// Extra fill chance at the end of a phrase.
pub const PHRASE_END_BOOST: f64 = 0.2;

/// Intensity tier for a tension value.
pub fn fill_tier(tension: f64) -> u8 {
    if tension < 0.3 {
        0
    } else if tension < 0.6 {
        1
    } else if tension <= 0.85 {
        2
    } else {
        3
    }
}

/// Chance that a unit ends in a fill.
pub fn fill_probability(section: &SectionContext, section_end: bool, phrase_end: bool) -> f64 {
    let mut p = section.fill_probability;
    if section_end {
        p += SECTION_END_BOOST;
    }
    if phrase_end {
        p += PHRASE_END_BOOST;
    }
    p.min(1.0)
}

pub struct FillContext<'a> {
    pub tension: f64,
    pub voices: &'a VoiceSet,
    pub previous: Option<FillKind>,
    /// Ticks of the unit; the fill occupies its trailing span.
    pub available_ticks: u64,
}

/// One concrete fill note, relative to the window start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillNote {
    pub role: Role,
    pub pitch: u8,
    pub offset: u64,
    pub velocity_scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillInstance {
    pub kind: FillKind,
    pub tier: u8,
    /// Length of the fill window in ticks.
    pub window_ticks: u64,
    pub notes: Vec<FillNote>,
}

impl FillInstance {
    /// Roles the fill plays, in priority order.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.notes.iter().map(|n| n.role).collect();
        roles.sort();
        roles.dedup();
        roles
    }

    /// Tick offset from the unit start where the window begins.
    pub fn window_start(&self, unit_ticks: u64) -> u64 {
        unit_ticks.saturating_sub(self.window_ticks)
    }
}

/// Pick and instantiate a fill for the given tension.
pub fn select_fill(ctx: &FillContext<'_>, rng: &mut RngContext) -> FillInstance {
    let tier = fill_tier(ctx.tension);
    let mut candidates = templates_in_tier(tier);
    if candidates.len() > 1 {
        if let Some(prev) = ctx.previous {
            candidates.retain(|t| t.kind != prev);
        }
    }
    let chosen = rng
        .pick(&candidates)
        .copied()
        .unwrap_or_else(|| &library::TEMPLATES[0]);
    instantiate(chosen, ctx.voices, ctx.available_ticks)
}

/// Map a template onto declared voices and ticks.
pub fn instantiate(template: &FillTemplate, voices: &VoiceSet, available_ticks: u64) -> FillInstance {
    let window = ((template.span * available_ticks as f64).round() as u64).clamp(1, available_ticks.max(1));
    let toms = voices.tom_pitches();
    let mut notes: Vec<FillNote> = Vec::with_capacity(template.entries.len());
    for entry in template.entries {
        let (role, pitch) = resolve_tag(entry.tag, voices, &toms);
        let at = (entry.position + entry.timing_offset) * window as f64;
        let offset = (at.round().max(0.0) as u64).min(window - 1);
        // Substitution can map two tags onto one voice; keep the first.
        if notes.iter().any(|n| n.role == role && n.offset == offset) {
            continue;
        }
        notes.push(FillNote {
            role,
            pitch,
            offset,
            velocity_scale: entry.velocity_scale,
        });
    }
    FillInstance {
        kind: template.kind,
        tier: template.tier,
        window_ticks: window,
        notes,
    }
}

fn resolve_tag(tag: FillTag, voices: &VoiceSet, toms: &[(Role, u8)]) -> (Role, u8) {
    let role = match tag {
        FillTag::Tom(i) if !toms.is_empty() => return toms[i as usize % toms.len()],
        FillTag::Tom(i) => Role::TOMS[i as usize % Role::TOMS.len()],
        FillTag::Kick => Role::Kick,
        FillTag::Snare => Role::Snare,
        FillTag::Clap => Role::Clap,
        FillTag::ClosedHat => Role::ClosedHat,
        FillTag::OpenHat => Role::OpenHat,
        FillTag::Crash => Role::Crash,
    };
    let voice = voices.resolve_or_substitute(role);
    (voice.role, voice.pitch())
}
