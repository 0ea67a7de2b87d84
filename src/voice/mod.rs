//! Voices and the closed set of physical roles they play.
//!
//! A [`Role`] is a drum-kit slot with fixed properties: limb, timing class,
//! General MIDI pitch, velocity range, and a fallback chain used when a
//! template asks for a role the session did not declare. A [`VoiceSet`] is
//! the session's declared voices, at most one per role.

pub mod constraint;
pub mod pitch;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use constraint::ConstraintTable;
pub use pitch::{PitchMap, PitchResolver};

use crate::error::{GrooveError, Result};

/// A physical voice slot. Declaration order is the tie-break priority for
/// simultaneous events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Kick,
    Snare,
    Rim,
    Clap,
    ClosedHat,
    PedalHat,
    OpenHat,
    Shaker,
    Cowbell,
    HighTom,
    MidTom,
    LowTom,
    Ride,
    Crash,
}

/// Which limb plays a role; two roles on the same limb never share spacing
/// state, but the limb decides how fast a single role can retrigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limb {
    RightFoot,
    LeftFoot,
    Hand,
}

/// How tightly a role sits on the grid when humanized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingClass {
    Tight,
    Loose,
}

impl Role {
    pub const ALL: [Role; 14] = [
        Role::Kick,
        Role::Snare,
        Role::Rim,
        Role::Clap,
        Role::ClosedHat,
        Role::PedalHat,
        Role::OpenHat,
        Role::Shaker,
        Role::Cowbell,
        Role::HighTom,
        Role::MidTom,
        Role::LowTom,
        Role::Ride,
        Role::Crash,
    ];

    /// Toms ordered high to low, the order tom runs walk through.
    pub const TOMS: [Role; 3] = [Role::HighTom, Role::MidTom, Role::LowTom];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Kick => "kick",
            Role::Snare => "snare",
            Role::Rim => "rim",
            Role::Clap => "clap",
            Role::ClosedHat => "closed_hat",
            Role::PedalHat => "pedal_hat",
            Role::OpenHat => "open_hat",
            Role::Shaker => "shaker",
            Role::Cowbell => "cowbell",
            Role::HighTom => "high_tom",
            Role::MidTom => "mid_tom",
            Role::LowTom => "low_tom",
            Role::Ride => "ride",
            Role::Crash => "crash",
        }
    }

    /// Parse a role name as written in configs (`closed_hat`, `kick`, ...).
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == name)
    }

    /// General MIDI percussion key.
    pub fn default_pitch(self) -> u8 {
        match self {
            Role::Kick => 36,
            Role::Snare => 38,
            Role::Rim => 37,
            Role::Clap => 39,
            Role::ClosedHat => 42,
            Role::PedalHat => 44,
            Role::OpenHat => 46,
            Role::Shaker => 70,
            Role::Cowbell => 56,
            Role::HighTom => 50,
            Role::MidTom => 47,
            Role::LowTom => 45,
            Role::Ride => 51,
            Role::Crash => 49,
        }
    }

    /// A second articulation of the same instrument.
    pub fn alternate_pitch(self) -> u8 {
        match self {
            Role::Kick => 35,
            Role::Snare => 40,
            Role::Rim => 75,
            Role::Clap => 54,
            Role::ClosedHat => 44,
            Role::PedalHat => 42,
            Role::OpenHat => 44,
            Role::Shaker => 69,
            Role::Cowbell => 67,
            Role::HighTom => 48,
            Role::MidTom => 48,
            Role::LowTom => 43,
            Role::Ride => 53,
            Role::Crash => 57,
        }
    }

    pub fn limb(self) -> Limb {
        match self {
            Role::Kick => Limb::RightFoot,
            Role::PedalHat => Limb::LeftFoot,
            _ => Limb::Hand,
        }
    }

    pub fn timing_class(self) -> TimingClass {
        match self {
            Role::Kick | Role::Snare | Role::Rim | Role::Clap => TimingClass::Tight,
            Role::HighTom | Role::MidTom | Role::LowTom => TimingClass::Tight,
            _ => TimingClass::Loose,
        }
    }

    /// Velocity range `(normal, accent)` before contour and dynamics.
    pub fn velocity_range(self) -> (f64, f64) {
        match self {
            Role::Kick => (100.0, 120.0),
            Role::Snare => (95.0, 115.0),
            Role::Rim => (70.0, 90.0),
            Role::Clap => (85.0, 105.0),
            Role::ClosedHat => (60.0, 85.0),
            Role::PedalHat => (50.0, 70.0),
            Role::OpenHat => (70.0, 90.0),
            Role::Shaker => (45.0, 70.0),
            Role::Cowbell => (60.0, 80.0),
            Role::HighTom | Role::MidTom | Role::LowTom => (85.0, 110.0),
            Role::Ride => (65.0, 85.0),
            Role::Crash => (95.0, 120.0),
        }
    }

    /// Roles that take soft ghost notes between main hits.
    pub fn takes_ghosts(self) -> bool {
        matches!(
            self,
            Role::Snare | Role::Rim | Role::ClosedHat | Role::Shaker
        )
    }

    pub fn is_tom(self) -> bool {
        Role::TOMS.contains(&self)
    }

    /// Substitutes tried in order when this role has no declared voice.
    pub fn fallbacks(self) -> &'static [Role] {
        match self {
            Role::Kick => &[Role::LowTom, Role::Snare],
            Role::Snare => &[Role::Rim, Role::Clap, Role::MidTom],
            Role::Rim => &[Role::Snare, Role::Clap],
            Role::Clap => &[Role::Snare, Role::Rim],
            Role::ClosedHat => &[Role::PedalHat, Role::Ride, Role::Shaker],
            Role::PedalHat => &[Role::ClosedHat],
            Role::OpenHat => &[Role::ClosedHat, Role::Ride, Role::Crash],
            Role::Shaker => &[Role::ClosedHat, Role::Cowbell],
            Role::Cowbell => &[Role::Rim, Role::Ride],
            Role::HighTom => &[Role::MidTom, Role::LowTom, Role::Snare],
            Role::MidTom => &[Role::HighTom, Role::LowTom, Role::Snare],
            Role::LowTom => &[Role::MidTom, Role::HighTom, Role::Kick],
            Role::Ride => &[Role::ClosedHat, Role::Crash],
            Role::Crash => &[Role::Ride, Role::OpenHat],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pitch declaration in a voice config: one key or a set of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PitchSpec {
    Single(u8),
    Set(Vec<u8>),
}

/// A voice as written in a session config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSpec {
    pub name: String,
    pub role: Role,
    /// Omitted pitches are resolved through the session's pitch resolver.
    #[serde(default)]
    pub pitch: Option<PitchSpec>,
}

impl VoiceSpec {
    pub fn new(name: &str, role: Role) -> Self {
        Self {
            name: name.to_string(),
            role,
            pitch: None,
        }
    }

    pub fn with_pitch(mut self, pitch: PitchSpec) -> Self {
        self.pitch = Some(pitch);
        self
    }
}

/// A resolved voice: a role with at least one concrete pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
    pub role: Role,
    pitches: Vec<u8>,
}

impl Voice {
    pub fn resolve(spec: &VoiceSpec, resolver: &dyn PitchResolver) -> Result<Self> {
        let pitches = match &spec.pitch {
            None => vec![resolver.resolve_pitch(spec.role)],
            Some(PitchSpec::Single(p)) => vec![*p],
            Some(PitchSpec::Set(set)) => set.clone(),
        };
        if pitches.is_empty() {
            return Err(GrooveError::invalid(format!(
                "voice '{}' declares an empty pitch set",
                spec.name
            )));
        }
        if let Some(bad) = pitches.iter().find(|&&p| p > 127) {
            return Err(GrooveError::invalid(format!(
                "voice '{}' pitch {bad} is outside 0-127",
                spec.name
            )));
        }
        Ok(Self {
            name: spec.name.clone(),
            role: spec.role,
            pitches,
        })
    }

    /// Primary pitch.
    pub fn pitch(&self) -> u8 {
        self.pitches[0]
    }

    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    /// Pitch for a scale degree of this voice's set, wrapping in both directions.
    pub fn pitch_for_degree(&self, degree: i8) -> u8 {
        let len = self.pitches.len() as i64;
        self.pitches[(degree as i64).rem_euclid(len) as usize]
    }

    /// An alternate articulation: another member of the set when there is
    /// one, otherwise the role's General MIDI alternate key.
    pub fn alternate_pitch(&self, current: u8) -> u8 {
        self.pitches
            .iter()
            .copied()
            .find(|&p| p != current)
            .unwrap_or_else(|| self.role.alternate_pitch())
    }
}

/// The declared voices of a session, keyed by role.
#[derive(Debug, Clone)]
pub struct VoiceSet {
    voices: BTreeMap<Role, Voice>,
    /// Highest-priority declared voice; the last resort for substitution.
    first: Voice,
}

impl VoiceSet {
    pub fn new(voices: Vec<Voice>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for voice in voices {
            let role = voice.role;
            if map.insert(role, voice).is_some() {
                return Err(GrooveError::invalid(format!(
                    "more than one voice declares role {role}"
                )));
            }
        }
        let first = map
            .values()
            .next()
            .cloned()
            .ok_or_else(|| GrooveError::invalid("voice list is empty"))?;
        Ok(Self { voices: map, first })
    }

    /// Resolve config specs through a pitch resolver.
    pub fn from_specs(specs: &[VoiceSpec], resolver: &dyn PitchResolver) -> Result<Self> {
        let voices = specs
            .iter()
            .map(|s| Voice::resolve(s, resolver))
            .collect::<Result<Vec<_>>>()?;
        Self::new(voices)
    }

    pub fn get(&self, role: Role) -> Option<&Voice> {
        self.voices.get(&role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.voices.contains_key(&role)
    }

    /// Declared roles in priority order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.voices.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.values()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Every declared tom pitch, high toms first.
    pub fn tom_pitches(&self) -> Vec<(Role, u8)> {
        Role::TOMS
            .iter()
            .filter_map(|r| self.voices.get(r))
            .flat_map(|v| v.pitches.iter().map(move |&p| (v.role, p)))
            .collect()
    }

    /// The voice for `role`, or `UnresolvedPitchRole` when none is declared.
    pub fn resolve(&self, role: Role) -> Result<&Voice> {
        self.voices
            .get(&role)
            .ok_or(GrooveError::UnresolvedPitchRole(role))
    }

    /// The voice for `role`, or the nearest declared substitute.
    ///
    /// Falls back through [`Role::fallbacks`], then to the first declared
    /// voice, logging each substitution.
    pub fn resolve_or_substitute(&self, role: Role) -> &Voice {
        match self.resolve(role) {
            Ok(voice) => voice,
            Err(err) => {
                let voice = role
                    .fallbacks()
                    .iter()
                    .find_map(|r| self.voices.get(r))
                    .unwrap_or(&self.first);
                tracing::warn!("{err}; substituting {}", voice.role);
                voice
            }
        }
    }
}
