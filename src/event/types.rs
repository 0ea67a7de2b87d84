//! The event data model handed to the host.
//!
//! A [`NoteCandidate`] is a note still being shaped (signed start, core flag,
//! unit boundary). The assembler turns surviving candidates into [`Event`]s.

use serde::{Deserialize, Serialize};

use crate::voice::Role;

/// A single emitted note, ready for insertion on the host timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub role: Role,
    /// MIDI note number (0–127).
    pub pitch: u8,
    /// Absolute start, 0-based from the start of the sequence.
    pub start_tick: u64,
    pub duration_ticks: u64,
    /// MIDI velocity (1–127).
    pub velocity: u8,
    /// MIDI channel (0–15).
    pub channel: u8,
}

/// A note on its way to becoming an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCandidate {
    pub role: Role,
    pub pitch: u8,
    /// Absolute start; may go negative while humanization pushes notes early.
    pub start: i64,
    pub duration: u64,
    /// Unclamped velocity; rounded and clamped to 1–127 on emission.
    pub velocity: f64,
    /// Blueprint core hit: must survive every later stage.
    pub core: bool,
    /// Unit this candidate belongs to.
    pub unit: usize,
    /// Step within the unit it was generated from.
    pub step: usize,
    /// Exclusive end of the owning unit, in absolute ticks.
    pub unit_end: u64,
}

impl NoteCandidate {
    /// Start clamped to the sequence origin.
    pub fn start_tick(&self) -> u64 {
        self.start.max(0) as u64
    }

    /// Velocity rounded into the MIDI range.
    pub fn midi_velocity(&self) -> u8 {
        self.velocity.round().clamp(1.0, 127.0) as u8
    }

    pub fn into_event(self, channel: u8) -> Event {
        Event {
            role: self.role,
            pitch: self.pitch,
            start_tick: self.start_tick(),
            duration_ticks: self.duration.max(1),
            velocity: self.midi_velocity(),
            channel,
        }
    }
}
