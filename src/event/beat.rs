//! Musical time expressed in integer ticks.
//!
//! The host converts between musical time and ticks linearly; [`TimeBase`]
//! is that conversion. All generation happens in ticks, and fractional
//! values are rounded only when a tick position is produced.

use serde::{Deserialize, Serialize};

/// Default ticks per quarter note. 960 divides cleanly by 2, 3, 4, 5, 6, 8,
/// 10, 12, 15, 16, 20, 24, 32.
pub const TICKS_PER_BEAT: u64 = 960;

/// Default time signature: 4 beats per bar.
pub const DEFAULT_BEATS_PER_BAR: u32 = 4;

/// Linear tick ↔ beat conversion at a fixed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBase {
    ticks_per_beat: u64,
}

impl TimeBase {
    /// Create a time base. A resolution of 0 is bumped to 1.
    pub fn new(ticks_per_beat: u64) -> Self {
        Self {
            ticks_per_beat: ticks_per_beat.max(1),
        }
    }

    pub fn ticks_per_beat(self) -> u64 {
        self.ticks_per_beat
    }

    /// Convert ticks to a fractional beat count.
    pub fn ticks_to_beats(self, ticks: u64) -> f64 {
        ticks as f64 / self.ticks_per_beat as f64
    }

    /// Rescale a tick amount written against [`TICKS_PER_BEAT`] to this
    /// resolution. Never returns 0 for a non-zero input.
    pub fn rescale(self, reference_ticks: u64) -> u64 {
        if reference_ticks == 0 {
            return 0;
        }
        let scaled = reference_ticks * self.ticks_per_beat / TICKS_PER_BEAT;
        scaled.max(1)
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new(TICKS_PER_BEAT)
    }
}
