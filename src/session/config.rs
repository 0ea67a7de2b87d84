//! Everything a generation run needs, loadable from YAML with defaults for
//! every optional field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::blueprint::Genre;
use crate::error::{GrooveError, Result};
use crate::event::{DEFAULT_BEATS_PER_BAR, TICKS_PER_BEAT};
use crate::humanize::swing::MAX_SWING;
use crate::humanize::SurpriseKind;
use crate::section::SectionMode;
use crate::voice::{PitchMap, Role, VoiceSpec};

fn default_units() -> usize {
    8
}

fn default_unit_ticks() -> u64 {
    TICKS_PER_BEAT * DEFAULT_BEATS_PER_BAR as u64
}

fn default_steps() -> usize {
    16
}

fn default_ticks_per_beat() -> u64 {
    TICKS_PER_BEAT
}

fn default_voices() -> Vec<VoiceSpec> {
    vec![
        VoiceSpec::new("kick", Role::Kick),
        VoiceSpec::new("snare", Role::Snare),
        VoiceSpec::new("closed hat", Role::ClosedHat),
        VoiceSpec::new("open hat", Role::OpenHat),
    ]
}

fn default_true() -> bool {
    true
}

fn default_surprises() -> Vec<SurpriseKind> {
    SurpriseKind::ALL.to_vec()
}

fn default_channel() -> u8 {
    9
}

fn default_note_length() -> usize {
    1
}

/// Input to one generation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_units")]
    pub repetition_units: usize,
    #[serde(default = "default_unit_ticks")]
    pub unit_duration_ticks: u64,
    #[serde(default = "default_steps")]
    pub steps_per_unit: usize,
    #[serde(default = "default_ticks_per_beat")]
    pub ticks_per_beat: u64,
    #[serde(default = "default_voices")]
    pub voices: Vec<VoiceSpec>,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub section_mode: SectionMode,
    #[serde(default = "default_true")]
    pub humanization_enabled: bool,
    /// Enabled surprise kinds; empty disables surprises.
    #[serde(default = "default_surprises")]
    pub surprises: Vec<SurpriseKind>,
    /// Overrides the genre's swing amount.
    #[serde(default)]
    pub swing: Option<f64>,
    #[serde(default = "default_channel")]
    pub channel: u8,
    #[serde(default = "default_note_length")]
    pub note_length_steps: usize,
    #[serde(default)]
    pub pitch_overrides: PitchMap,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            repetition_units: default_units(),
            unit_duration_ticks: default_unit_ticks(),
            steps_per_unit: default_steps(),
            ticks_per_beat: default_ticks_per_beat(),
            voices: default_voices(),
            genre: Genre::default(),
            section_mode: SectionMode::default(),
            humanization_enabled: true,
            surprises: default_surprises(),
            swing: None,
            channel: default_channel(),
            note_length_steps: default_note_length(),
            pitch_overrides: PitchMap::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check numeric ranges. Voice checks happen when voices are resolved.
    pub fn validate(&self) -> Result<()> {
        if self.repetition_units == 0 {
            return Err(GrooveError::invalid("repetition_units must be at least 1"));
        }
        if self.unit_duration_ticks == 0 {
            return Err(GrooveError::invalid("unit_duration_ticks must be at least 1"));
        }
        if self.steps_per_unit == 0 {
            return Err(GrooveError::invalid("steps_per_unit must be at least 1"));
        }
        if self.ticks_per_beat == 0 {
            return Err(GrooveError::invalid("ticks_per_beat must be at least 1"));
        }
        if self.voices.is_empty() {
            return Err(GrooveError::invalid("at least one voice is required"));
        }
        if self.channel > 15 {
            return Err(GrooveError::invalid(format!(
                "channel {} is outside 0-15",
                self.channel
            )));
        }
        if self.note_length_steps == 0 {
            return Err(GrooveError::invalid("note_length_steps must be at least 1"));
        }
        if let Some(swing) = self.swing {
            if !(0.0..=MAX_SWING).contains(&swing) {
                return Err(GrooveError::invalid(format!(
                    "swing {swing} is outside 0-{MAX_SWING}"
                )));
            }
        }
        Ok(())
    }

    /// Swing in effect: the override, else the genre default.
    pub fn effective_swing(&self) -> f64 {
        self.swing.unwrap_or_else(|| self.genre.blueprint().swing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionKind;

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unit_duration_ticks, 3840);
        assert_eq!(config.channel, 9);
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let config = SessionConfig::from_yaml("seed: 42\ngenre: funk\n").unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.genre, Genre::Funk);
        assert_eq!(config.steps_per_unit, 16);
        assert_eq!(config.voices.len(), 4);
        assert!(config.humanization_enabled);
        assert_eq!(config.surprises.len(), SurpriseKind::ALL.len());
    }

    #[test]
    fn full_yaml_config() {
        let yaml = r#"
seed: 7
repetition_units: 12
genre: hiphop
section_mode: !manual chorus
swing: 0.25
surprises: [drop, flam]
voices:
  - name: kick
    role: kick
  - name: toms
    role: mid_tom
    pitch: [48, 45, 43]
  - name: snare
    role: snare
    pitch: 40
pitch_overrides:
  overrides:
    kick: 35
"#;
        let config = SessionConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.section_mode, SectionMode::Manual(SectionKind::Chorus));
        assert_eq!(config.surprises, vec![SurpriseKind::Drop, SurpriseKind::Flam]);
        assert_eq!(config.voices[1].role, Role::MidTom);
        assert_eq!(config.effective_swing(), 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut c = SessionConfig::default();
        c.repetition_units = 0;
        assert!(matches!(c.validate(), Err(GrooveError::InvalidParameter(_))));

        let mut c = SessionConfig::default();
        c.swing = Some(0.9);
        assert!(c.validate().is_err());

        let mut c = SessionConfig::default();
        c.channel = 16;
        assert!(c.validate().is_err());

        let mut c = SessionConfig::default();
        c.voices.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn swing_falls_back_to_genre() {
        let c = SessionConfig {
            genre: Genre::HipHop,
            ..SessionConfig::default()
        };
        assert_eq!(c.effective_swing(), Genre::HipHop.blueprint().swing);
    }

    #[test]
    fn yaml_round_trip() {
        let c = SessionConfig {
            seed: 99,
            swing: Some(0.1),
            ..SessionConfig::default()
        };
        let back = SessionConfig::from_yaml(&c.to_yaml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groove.yaml");
        std::fs::write(&path, "seed: 3\nrepetition_units: 2\n").unwrap();
        let c = SessionConfig::load(&path).unwrap();
        assert_eq!(c.repetition_units, 2);
        assert!(SessionConfig::load(&dir.path().join("missing.yaml")).is_err());
    }
}
