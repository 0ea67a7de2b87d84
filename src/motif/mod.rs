//! Motif memory: short per-voice phrases harvested from generated units and
//! recalled, transformed, into later ones.
//!
//! Each role keeps a bounded [`MotifHistory`]. Recall never touches the
//! history; it returns a transformed copy that the engine writes back into
//! the unit's lane without clearing core hits.

pub mod history;
pub mod transform;

use std::collections::BTreeMap;

pub use history::{MotifHistory, HISTORY_CAPACITY};
pub use transform::{transform, Transformation};

use crate::error::{GrooveError, Result};
use crate::rhythm::{Lane, Pattern};
use crate::rng::RngContext;
use crate::voice::Role;

/// Shortest motif, in cells.
pub const MIN_MOTIF_CELLS: usize = 2;
/// Longest motif, in cells.
pub const MAX_MOTIF_CELLS: usize = 5;

/// One step of a motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifCell {
    /// Step offset from the motif start.
    pub offset: u8,
    pub hit: bool,
    /// Scale degree for pitched voices.
    pub degree: Option<i8>,
    /// Length in steps.
    pub length: u8,
}

impl MotifCell {
    pub fn hit(offset: u8) -> Self {
        Self {
            offset,
            hit: true,
            degree: None,
            length: 1,
        }
    }

    pub fn rest(offset: u8) -> Self {
        Self {
            offset,
            hit: false,
            degree: None,
            length: 1,
        }
    }

    pub fn pitched(offset: u8, degree: i8, length: u8) -> Self {
        Self {
            offset,
            hit: true,
            degree: Some(degree),
            length: length.max(1),
        }
    }
}

/// A short phrase owned by one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motif {
    role: Role,
    cells: Vec<MotifCell>,
}

impl Motif {
    /// Build a motif of 2–5 cells with strictly ascending offsets.
    pub fn new(role: Role, cells: Vec<MotifCell>) -> Result<Self> {
        if !(MIN_MOTIF_CELLS..=MAX_MOTIF_CELLS).contains(&cells.len()) {
            return Err(GrooveError::invalid(format!(
                "motif length {} is outside {MIN_MOTIF_CELLS}-{MAX_MOTIF_CELLS}",
                cells.len()
            )));
        }
        if cells.windows(2).any(|w| w[0].offset >= w[1].offset) {
            return Err(GrooveError::invalid("motif offsets must ascend"));
        }
        Ok(Self { role, cells })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn cells(&self) -> &[MotifCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Steps covered from the first cell to the end of the last.
    pub fn span(&self) -> usize {
        self.cells.last().map(|c| c.offset as usize + 1).unwrap_or(0)
    }

    pub fn hit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.hit).count()
    }

    pub fn get_hit(&self, index: usize) -> bool {
        self.cells.get(index).map(|c| c.hit).unwrap_or(false)
    }

    pub fn hit_pattern(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.hit).collect()
    }
}

/// Outcome of a successful recall.
#[derive(Debug, Clone, PartialEq)]
pub struct Recall {
    pub transformation: Transformation,
    pub motif: Motif,
}

/// Recall probability by unit index.
pub fn recall_probability(unit_index: usize) -> f64 {
    match unit_index {
        0 => 0.0,
        1 => 0.5,
        _ => 0.7,
    }
}

/// Per-role motif histories for one session.
#[derive(Debug, Clone, Default)]
pub struct MotifEngine {
    histories: BTreeMap<Role, MotifHistory>,
}

impl MotifEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a motif for `role`.
    pub fn store(&mut self, role: Role, motif: Motif) -> Result<()> {
        if motif.role != role {
            return Err(GrooveError::invalid(format!(
                "motif for {} stored under {role}",
                motif.role
            )));
        }
        self.histories.entry(role).or_default().push(motif);
        Ok(())
    }

    pub fn history(&self, role: Role) -> Option<&MotifHistory> {
        self.histories.get(&role)
    }

    /// Maybe recall a transformed copy of a stored motif.
    ///
    /// Returns `None` without consuming randomness when nothing is stored.
    pub fn recall(&self, role: Role, unit_index: usize, rng: &mut RngContext) -> Option<Recall> {
        let history = self.histories.get(&role).filter(|h| !h.is_empty())?;
        if !rng.chance(recall_probability(unit_index)) {
            return None;
        }
        let source = history.get(rng.index(history.len()))?;
        let options = Transformation::applicable(source);
        let kind = *rng.pick(&options)?;
        Some(Recall {
            transformation: kind,
            motif: transform(source, kind, rng),
        })
    }

    /// Recall into, then harvest from, every lane of `pattern`.
    pub fn develop(&mut self, pattern: &mut Pattern, unit_index: usize, rng: &mut RngContext) {
        for role in pattern.roles() {
            if let Some(recall) = self.recall(role, unit_index, rng) {
                if let Some(lane) = pattern.existing_lane_mut(role) {
                    let at = write_back(lane, &recall.motif, rng);
                    tracing::debug!(
                        "unit {unit_index}: {role} recalls {:?} at step {at}",
                        recall.transformation
                    );
                }
            }
            let harvested = pattern.lane(role).and_then(|lane| harvest(role, lane, rng));
            if let Some(motif) = harvested {
                self.histories.entry(motif.role()).or_default().push(motif);
            }
        }
    }
}

/// Cut a 2–5 step window containing at least one hit out of `lane`.
pub fn harvest(role: Role, lane: &Lane, rng: &mut RngContext) -> Option<Motif> {
    let steps = lane.steps();
    if steps < MIN_MOTIF_CELLS {
        return None;
    }
    let len = rng.between(MIN_MOTIF_CELLS, MAX_MOTIF_CELLS.min(steps));
    let starts: Vec<usize> = (0..=steps - len)
        .filter(|&s| (s..s + len).any(|i| lane.hits.get(i)))
        .collect();
    let start = *rng.pick(&starts)?;
    let pitched = role.is_tom() || role == Role::Cowbell;
    let cells = (0..len)
        .map(|i| {
            let step = start + i;
            MotifCell {
                offset: i as u8,
                hit: lane.hits.get(step),
                degree: pitched.then(|| lane.degrees[step]),
                length: lane.lengths[step].max(1),
            }
        })
        .collect();
    Motif::new(role, cells).ok()
}

/// Write a motif into `lane` at an RNG-chosen step. Rests only clear
/// variable hits. Returns the start step.
pub fn write_back(lane: &mut Lane, motif: &Motif, rng: &mut RngContext) -> usize {
    let steps = lane.steps();
    let span = motif.span().min(steps);
    let at = rng.index(steps - span + 1);
    for cell in motif.cells() {
        let step = at + cell.offset as usize;
        if step >= steps {
            continue;
        }
        if cell.hit {
            lane.add_hit(step);
            if let Some(degree) = cell.degree {
                lane.degrees[step] = degree;
            }
            lane.lengths[step] = cell.length.max(1);
        } else {
            lane.clear_variable(step);
        }
    }
    at
}
