//! Musical time, unit geometry, and the events the engine emits.
//!
//! Generation works in integer ticks. A [`UnitGrid`] maps steps of one
//! repetition unit onto tick offsets; [`NoteCandidate`]s carry notes through
//! humanization and spacing repair; [`Event`]s are the final output handed
//! to an [`EventSink`].

pub mod beat;
pub mod grid;
pub mod timeline;
pub mod types;

pub use beat::{TimeBase, DEFAULT_BEATS_PER_BAR, TICKS_PER_BEAT};
pub use grid::UnitGrid;
pub use timeline::{EventSink, Timeline};
pub use types::{Event, NoteCandidate};
