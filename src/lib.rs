//! Backbeat — a deterministic generative drum-groove engine.
//!
//! Configuration in, ordered MIDI-style event list out. See [`session::Session`]
//! for the entry point.

pub mod assembler;
pub mod blueprint;
pub mod error;
pub mod event;
pub mod fill;
pub mod humanize;
pub mod interaction;
pub mod motif;
pub mod rhythm;
pub mod rng;
pub mod section;
pub mod session;
pub mod voice;

pub use error::{GrooveError, Result};
pub use event::Event;
pub use session::{Session, SessionConfig};
