//! Note-insertion sink: the host-side end of a generation session.
//!
//! The engine hands a finished batch of events to an [`EventSink`]; the sink
//! owns ordering on the host timeline. [`Timeline`] is the in-memory sink used
//! by the CLI and tests. Batch insertion defers sorting until the next read.

use super::types::Event;

/// Accepts a complete batch of generated events.
pub trait EventSink {
    fn insert_batch(&mut self, events: Vec<Event>);
}

/// A sorted in-memory timeline of events.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<Event>,
    dirty: bool,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in time order.
    pub fn events(&mut self) -> &[Event] {
        self.ensure_sorted();
        &self.events
    }

    /// Total number of events in the timeline.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stable sort so simultaneous events keep insertion order.
    fn ensure_sorted(&mut self) {
        if self.dirty {
            self.events.sort_by_key(|e| e.start_tick);
            self.dirty = false;
        }
    }
}

impl EventSink for Timeline {
    fn insert_batch(&mut self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }
        self.events.extend(events);
        self.dirty = true;
    }
}
