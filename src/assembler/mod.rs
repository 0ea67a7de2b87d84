//! Final spacing repair and event emission.
//!
//! Candidates are walked per role in time order. A note that lands too soon
//! after the previous kept note on the same role is pushed to the earliest
//! legal tick when that stays inside its unit, and dropped otherwise. Core
//! notes instead evict non-core predecessors. No emitted pair of same-role
//! events is ever closer than the role's minimum interval.

use std::collections::BTreeMap;

use crate::error::{GrooveError, Result};
use crate::event::{Event, NoteCandidate};
use crate::voice::{ConstraintTable, Role};

#[derive(Debug, Clone)]
pub struct Assembler {
    constraints: ConstraintTable,
    channel: u8,
}

impl Assembler {
    pub fn new(constraints: ConstraintTable, channel: u8) -> Self {
        Self {
            constraints,
            channel: channel.min(15),
        }
    }

    pub fn constraints(&self) -> &ConstraintTable {
        &self.constraints
    }

    /// Reject unit lengths no declared role can be played in.
    pub fn check_unit(&self, unit_ticks: u64, roles: &[Role]) -> Result<()> {
        if self.constraints.unit_too_short(unit_ticks, roles.iter().copied()) {
            let role = roles.iter().copied().min().unwrap_or(Role::Kick);
            return Err(GrooveError::ConstraintViolationAfterGeneration { role, tick: 0 });
        }
        Ok(())
    }

    /// Repair spacing and emit the sorted event list.
    pub fn assemble(&self, candidates: Vec<NoteCandidate>) -> Result<Vec<Event>> {
        let mut by_role: BTreeMap<Role, Vec<NoteCandidate>> = BTreeMap::new();
        for c in candidates {
            by_role.entry(c.role).or_default().push(c);
        }

        let mut events = Vec::new();
        let mut dropped = 0usize;
        for (role, mut notes) in by_role {
            notes.sort_by_key(|c| (c.start_tick(), !c.core, c.pitch));
            let kept = self.space_role(role, notes, &mut dropped)?;
            events.extend(kept.into_iter().map(|c| c.into_event(self.channel)));
        }
        events.sort_by_key(|e| (e.start_tick, e.role, e.pitch));
        self.verify(&events)?;
        if dropped > 0 {
            tracing::debug!("spacing repair dropped {dropped} notes");
        }
        Ok(events)
    }

    fn space_role(
        &self,
        role: Role,
        notes: Vec<NoteCandidate>,
        dropped: &mut usize,
    ) -> Result<Vec<NoteCandidate>> {
        let min = self.constraints.min_interval(role);
        let mut kept: Vec<NoteCandidate> = Vec::with_capacity(notes.len());
        for mut c in notes {
            let tick = c.start_tick();
            if c.core {
                while kept
                    .last()
                    .is_some_and(|prev| !prev.core && tick < prev.start_tick() + min)
                {
                    kept.pop();
                    *dropped += 1;
                }
            }
            let Some(prev) = kept.last() else {
                kept.push(c);
                continue;
            };
            let boundary = prev.start_tick() + min;
            if tick >= boundary {
                kept.push(c);
            } else if boundary < c.unit_end {
                tracing::debug!("{role}: delaying note at {tick} to {boundary}");
                c.start = boundary as i64;
                kept.push(c);
            } else if c.core {
                return Err(GrooveError::ConstraintViolationAfterGeneration { role, tick });
            } else {
                *dropped += 1;
            }
        }
        Ok(kept)
    }

    fn verify(&self, events: &[Event]) -> Result<()> {
        let mut last: BTreeMap<Role, u64> = BTreeMap::new();
        for e in events {
            if let Some(&prev) = last.get(&e.role) {
                if e.start_tick < prev + self.constraints.min_interval(e.role) {
                    return Err(GrooveError::ConstraintViolationAfterGeneration {
                        role: e.role,
                        tick: e.start_tick,
                    });
                }
            }
            last.insert(e.role, e.start_tick);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> Assembler {
        Assembler::new(ConstraintTable::default(), 9)
    }

    fn note(role: Role, start: i64, core: bool) -> NoteCandidate {
        NoteCandidate {
            role,
            pitch: role.default_pitch(),
            start,
            duration: 100,
            velocity: 90.0,
            core,
            unit: 0,
            step: 0,
            unit_end: 3840,
        }
    }

    #[test]
    fn close_notes_are_delayed() {
        let out = assembler()
            .assemble(vec![note(Role::Snare, 100, false), note(Role::Snare, 110, false)])
            .unwrap();
        let starts: Vec<u64> = out.iter().map(|e| e.start_tick).collect();
        assert_eq!(starts, vec![100, 140]);
    }

    #[test]
    fn delays_past_the_unit_end_drop() {
        let out = assembler()
            .assemble(vec![note(Role::Kick, 3790, false), note(Role::Kick, 3800, false)])
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn core_evicts_non_core_predecessor() {
        let out = assembler()
            .assemble(vec![note(Role::Kick, 950, false), note(Role::Kick, 960, true)])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_tick, 960);
    }

    #[test]
    fn core_that_cannot_fit_is_an_error() {
        let mut late = note(Role::Kick, 3830, true);
        late.unit_end = 3840;
        let err = assembler()
            .assemble(vec![note(Role::Kick, 3800, true), late])
            .unwrap_err();
        assert!(matches!(
            err,
            GrooveError::ConstraintViolationAfterGeneration { role: Role::Kick, .. }
        ));
    }

    #[test]
    fn output_is_ordered_by_time_then_priority() {
        let out = assembler()
            .assemble(vec![
                note(Role::ClosedHat, 0, false),
                note(Role::Snare, 480, false),
                note(Role::Kick, 0, true),
            ])
            .unwrap();
        let roles: Vec<Role> = out.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Kick, Role::ClosedHat, Role::Snare]);
        assert!(out.iter().all(|e| e.channel == 9));
    }

    #[test]
    fn spacing_holds_for_dense_input() {
        let notes: Vec<NoteCandidate> = (0..400).map(|i| note(Role::ClosedHat, i * 7, false)).collect();
        let out = assembler().assemble(notes).unwrap();
        for w in out.windows(2) {
            assert!(w[1].start_tick - w[0].start_tick >= 40);
        }
        assert!(out.iter().all(|e| e.start_tick < 3840));
    }

    #[test]
    fn negative_starts_clamp_to_zero() {
        let out = assembler().assemble(vec![note(Role::Snare, -12, false)]).unwrap();
        assert_eq!(out[0].start_tick, 0);
    }

    #[test]
    fn unit_shorter_than_every_interval_is_rejected() {
        let a = assembler();
        assert!(a.check_unit(20, &[Role::Kick, Role::Snare, Role::ClosedHat]).is_err());
        assert!(a.check_unit(50, &[Role::Kick, Role::Snare]).is_ok());
    }
}
