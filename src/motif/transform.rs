//! Motif transformations. Each returns a new motif; the source is untouched.

use serde::{Deserialize, Serialize};

use super::{Motif, MotifCell};
use crate::rng::RngContext;

/// The ways a recalled motif can be varied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    /// Flip every hit to a rest and back.
    Invert,
    /// Rotate cell content by a non-zero offset.
    Shift,
    /// Drop hits at 50 %, keeping at least one.
    Sparsify,
    /// Turn rests into hits at 30 %.
    Densify,
    /// Move pitched cells two scale steps up or down.
    Sequence,
    /// Keep a contiguous sub-range of at least two cells.
    Fragment,
    /// Reverse the cell order.
    Retrograde,
    /// Re-assign note lengths while keeping the degree order.
    Displace,
}

impl Transformation {
    pub const ALL: [Transformation; 8] = [
        Transformation::Invert,
        Transformation::Shift,
        Transformation::Sparsify,
        Transformation::Densify,
        Transformation::Sequence,
        Transformation::Fragment,
        Transformation::Retrograde,
        Transformation::Displace,
    ];

    /// Probabilistic transformations that may leave a motif unchanged.
    pub fn may_be_identity(self) -> bool {
        matches!(self, Transformation::Sparsify | Transformation::Densify)
    }

    /// Whether this transformation can visibly change `motif`.
    pub fn applies_to(self, motif: &Motif) -> bool {
        let cells = &motif.cells;
        match self {
            Transformation::Invert => true,
            Transformation::Shift => !changing_rotations(cells).is_empty(),
            Transformation::Sparsify => motif.hit_count() >= 2,
            Transformation::Densify => cells.iter().any(|c| !c.hit),
            Transformation::Sequence => cells.iter().any(|c| c.degree.is_some()),
            Transformation::Fragment => cells.len() >= 3,
            Transformation::Retrograde => &retrograde(cells) != cells,
            Transformation::Displace => !changing_length_rotations(cells).is_empty(),
        }
    }

    /// Transformations that can change `motif`.
    pub fn applicable(motif: &Motif) -> Vec<Transformation> {
        Transformation::ALL
            .into_iter()
            .filter(|t| t.applies_to(motif))
            .collect()
    }
}

/// Apply one transformation, producing an independent copy.
///
/// Applying a transformation that does not apply returns an unchanged copy.
pub fn transform(motif: &Motif, kind: Transformation, rng: &mut RngContext) -> Motif {
    let cells = &motif.cells;
    let out = match kind {
        Transformation::Invert => cells
            .iter()
            .map(|c| MotifCell { hit: !c.hit, ..*c })
            .collect(),
        Transformation::Shift => {
            let options = changing_rotations(cells);
            match rng.pick(&options) {
                Some(&k) => rotate_content(cells, k),
                None => cells.clone(),
            }
        }
        Transformation::Sparsify => sparsify(cells, rng),
        Transformation::Densify => cells
            .iter()
            .map(|c| {
                if !c.hit && rng.chance(0.3) {
                    MotifCell { hit: true, ..*c }
                } else {
                    *c
                }
            })
            .collect(),
        Transformation::Sequence => {
            let step: i8 = if rng.chance(0.5) { 2 } else { -2 };
            cells
                .iter()
                .map(|c| MotifCell {
                    degree: c.degree.map(|d| d.saturating_add(step)),
                    ..*c
                })
                .collect()
        }
        Transformation::Fragment => fragment(cells, rng),
        Transformation::Retrograde => retrograde(cells),
        Transformation::Displace => {
            let options = changing_length_rotations(cells);
            match rng.pick(&options) {
                Some(&k) => rotate_lengths(cells, k),
                None => cells.clone(),
            }
        }
    };
    Motif {
        role: motif.role,
        cells: out,
    }
}

fn content(c: &MotifCell) -> (bool, Option<i8>, u8) {
    (c.hit, c.degree, c.length)
}

fn rotate_content(cells: &[MotifCell], k: usize) -> Vec<MotifCell> {
    let n = cells.len();
    (0..n)
        .map(|i| {
            let src = &cells[(i + n - k % n) % n];
            MotifCell {
                offset: cells[i].offset,
                hit: src.hit,
                degree: src.degree,
                length: src.length,
            }
        })
        .collect()
}

fn changing_rotations(cells: &[MotifCell]) -> Vec<usize> {
    (1..cells.len())
        .filter(|&k| {
            let rotated = rotate_content(cells, k);
            rotated.iter().zip(cells).any(|(a, b)| content(a) != content(b))
        })
        .collect()
}

fn rotate_lengths(cells: &[MotifCell], k: usize) -> Vec<MotifCell> {
    let n = cells.len();
    (0..n)
        .map(|i| MotifCell {
            length: cells[(i + n - k % n) % n].length,
            ..cells[i]
        })
        .collect()
}

fn changing_length_rotations(cells: &[MotifCell]) -> Vec<usize> {
    (1..cells.len())
        .filter(|&k| {
            rotate_lengths(cells, k)
                .iter()
                .zip(cells)
                .any(|(a, b)| a.length != b.length)
        })
        .collect()
}

fn sparsify(cells: &[MotifCell], rng: &mut RngContext) -> Vec<MotifCell> {
    let mut out: Vec<MotifCell> = cells.to_vec();
    let mut removed = Vec::new();
    for (i, cell) in out.iter_mut().enumerate() {
        if cell.hit && rng.chance(0.5) {
            cell.hit = false;
            removed.push(i);
        }
    }
    if !removed.is_empty() && out.iter().all(|c| !c.hit) {
        let keep = removed[rng.index(removed.len())];
        out[keep].hit = true;
    }
    out
}

fn fragment(cells: &[MotifCell], rng: &mut RngContext) -> Vec<MotifCell> {
    let n = cells.len();
    if n < 3 {
        return cells.to_vec();
    }
    let len = rng.between(2, n - 1);
    let start = rng.index(n - len + 1);
    let base = cells[start].offset;
    cells[start..start + len]
        .iter()
        .map(|c| MotifCell {
            offset: c.offset - base,
            ..*c
        })
        .collect()
}

/// Reverse content; offsets are mirrored so they stay ascending.
fn retrograde(cells: &[MotifCell]) -> Vec<MotifCell> {
    let span = cells.last().map(|c| c.offset).unwrap_or(0);
    cells
        .iter()
        .rev()
        .map(|c| MotifCell {
            offset: span - c.offset,
            ..*c
        })
        .collect()
}
