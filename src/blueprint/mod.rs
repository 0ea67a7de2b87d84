//! Genre blueprints — invariant core hits plus probabilistic variations.
//!
//! A blueprint is written on a 16-step reference grid and scaled onto the
//! session grid. Core rules are forced first. Each variation then draws its
//! Bernoulli trial and any choice its effect needs, in declaration order,
//! whether or not the effect fires or applies to the current unit. The draw
//! sequence therefore never depends on unit position. Core positions are
//! re-asserted after the last effect.

pub mod genres;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::UnitGrid;
use crate::rhythm::{euclid, Pattern};
use crate::rng::RngContext;
use crate::voice::Role;

/// A musical style with its own blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    #[default]
    House,
    Techno,
    HipHop,
    Funk,
    Rock,
    Breakbeat,
    Trap,
    Euclidean,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::House,
        Genre::Techno,
        Genre::HipHop,
        Genre::Funk,
        Genre::Rock,
        Genre::Breakbeat,
        Genre::Trap,
        Genre::Euclidean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::House => "house",
            Genre::Techno => "techno",
            Genre::HipHop => "hiphop",
            Genre::Funk => "funk",
            Genre::Rock => "rock",
            Genre::Breakbeat => "breakbeat",
            Genre::Trap => "trap",
            Genre::Euclidean => "euclidean",
        }
    }

    pub fn from_name(name: &str) -> Option<Genre> {
        let lower = name.to_lowercase();
        Genre::ALL.into_iter().find(|g| g.as_str() == lower)
    }

    pub fn blueprint(self) -> &'static Blueprint {
        genres::blueprint(self)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hits that are never removed by any later stage.
#[derive(Debug)]
pub struct CoreRule {
    pub role: Role,
    pub steps: &'static [usize],
}

/// What a variation does to the pattern when its trial succeeds.
#[derive(Debug)]
pub enum Effect {
    /// Add hits.
    Add { role: Role, steps: &'static [usize] },
    /// Clear the role's variable hits, then add these.
    Replace { role: Role, steps: &'static [usize] },
    /// Clear variable hits at these steps.
    Remove { role: Role, steps: &'static [usize] },
    /// Overlay a Euclidean pattern, rotation picked from the list.
    Euclid {
        role: Role,
        pulses: usize,
        rotations: &'static [usize],
    },
}

/// A `(probability, effect)` pair, optionally limited to every n-th unit.
#[derive(Debug)]
pub struct Variation {
    pub probability: f64,
    /// Applies on units where `(unit + 1) % every == 0`; 1 means every unit.
    pub every: usize,
    pub effect: Effect,
}

impl Variation {
    pub fn applies_to(&self, unit_index: usize) -> bool {
        self.every <= 1 || (unit_index + 1) % self.every == 0
    }
}

/// The full rule set for one genre.
#[derive(Debug)]
pub struct Blueprint {
    pub genre: Genre,
    pub core: &'static [CoreRule],
    pub variations: &'static [Variation],
    /// Default swing amount in steps (0 = straight).
    pub swing: f64,
}

impl Blueprint {
    /// Roles with at least one core rule.
    pub fn core_roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self.core.iter().map(|r| r.role).collect();
        roles.sort();
        roles.dedup();
        roles
    }

    /// Core positions for `role`, on the session grid.
    pub fn core_steps(&self, role: Role, grid: &UnitGrid) -> Vec<usize> {
        let mut steps: Vec<usize> = self
            .core
            .iter()
            .filter(|r| r.role == role)
            .flat_map(|r| r.steps.iter().map(|&s| grid.from_reference(s)))
            .collect();
        steps.sort_unstable();
        steps.dedup();
        steps
    }
}

impl Effect {
    /// Draw the effect's random choice: a rotation for Euclid overlays, no
    /// draw for the others.
    fn draw(&self, rng: &mut RngContext) -> usize {
        match *self {
            Effect::Euclid { rotations, .. } => rng.pick(rotations).copied().unwrap_or(0),
            _ => 0,
        }
    }

    fn apply(&self, pattern: &mut Pattern, grid: &UnitGrid, rotation: usize) -> Result<()> {
        match *self {
            Effect::Add { role, steps } => {
                let lane = pattern.lane_mut(role);
                for &s in steps {
                    lane.add_hit(grid.from_reference(s));
                }
            }
            Effect::Replace { role, steps } => {
                let lane = pattern.lane_mut(role);
                lane.clear_all_variable();
                for &s in steps {
                    lane.add_hit(grid.from_reference(s));
                }
            }
            Effect::Remove { role, steps } => {
                if let Some(lane) = pattern.existing_lane_mut(role) {
                    for &s in steps {
                        lane.clear_variable(grid.from_reference(s));
                    }
                }
            }
            Effect::Euclid { role, pulses, .. } => {
                let n = grid.steps();
                let k = if pulses == 0 {
                    0
                } else {
                    (pulses * n / 16).clamp(1, n)
                };
                let overlay = euclid(n, k, rotation * n / 16)?;
                pattern.lane_mut(role).hits.union_with(&overlay);
            }
        }
        Ok(())
    }
}

/// Build one unit's per-voice step sequences for `genre`.
pub fn apply_blueprint(
    genre: Genre,
    unit_index: usize,
    grid: &UnitGrid,
    rng: &mut RngContext,
) -> Result<Pattern> {
    let blueprint = genre.blueprint();
    let mut pattern = Pattern::new(grid.steps());

    for rule in blueprint.core {
        let lane = pattern.lane_mut(rule.role);
        for &s in rule.steps {
            lane.force_core(grid.from_reference(s));
        }
    }

    for variation in blueprint.variations {
        let fired = rng.chance(variation.probability);
        let rotation = variation.effect.draw(rng);
        if fired && variation.applies_to(unit_index) {
            variation.effect.apply(&mut pattern, grid, rotation)?;
        }
    }

    pattern.enforce_core();
    Ok(pattern)
}
