//! Role → pitch resolution injected at session start.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Role;

/// Maps a role to a concrete MIDI key.
pub trait PitchResolver {
    fn resolve_pitch(&self, role: Role) -> u8;
}

impl<F> PitchResolver for F
where
    F: Fn(Role) -> u8,
{
    fn resolve_pitch(&self, role: Role) -> u8 {
        self(role)
    }
}

/// General MIDI percussion map with optional per-role overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchMap {
    #[serde(default)]
    pub overrides: BTreeMap<Role, u8>,
}

impl PitchMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, role: Role, pitch: u8) -> Self {
        self.overrides.insert(role, pitch.min(127));
        self
    }
}

impl PitchResolver for PitchMap {
    fn resolve_pitch(&self, role: Role) -> u8 {
        self.overrides
            .get(&role)
            .copied()
            .unwrap_or_else(|| role.default_pitch())
    }
}
