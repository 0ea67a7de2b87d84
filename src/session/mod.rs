//! Generation session — runs every stage over every unit and hands the
//! assembled events back in one batch.
//!
//! A session owns the only [`RngContext`], the motif engine and the tension
//! tracker. Stages run in a fixed order per unit, so a given config always
//! yields the same events:
//!
//! 1. blueprint skeleton
//! 2. section density shaping
//! 3. motif recall and harvest
//! 4. voice interaction
//! 5. fill decision and selection
//! 6. swing, humanization and surprises per note
//!
//! The assembler then repairs spacing across the whole sequence.

pub mod config;
pub mod settings;

pub use config::SessionConfig;
pub use settings::{
    default_settings_path, recall_config, remember_config, MemorySettingsStore, SettingsStore,
    YamlSettingsStore,
};

use crate::assembler::Assembler;
use crate::blueprint::apply_blueprint;
use crate::error::Result;
use crate::event::{Event, EventSink, NoteCandidate, TimeBase, UnitGrid};
use crate::fill::{fill_probability, select_fill, FillContext, FillInstance, FillKind};
use crate::humanize::{apply_dynamics, apply_swing, humanize, maybe_surprise, Feel, SurpriseContext};
use crate::interaction::{apply_interactions, PHRASE_UNITS};
use crate::motif::MotifEngine;
use crate::rhythm::Pattern;
use crate::rng::RngContext;
use crate::section::{is_last_before_change, section_for, shape_density, SectionContext, TensionTracker};
use crate::voice::{ConstraintTable, PitchResolver, Role, VoiceSet};

/// Velocity scale for lane ghost notes.
const GHOST_VELOCITY: f64 = 0.35;

/// Hats thinned under a fill.
const FILL_CLEARED_HATS: [Role; 3] = [Role::ClosedHat, Role::PedalHat, Role::OpenHat];

pub struct Session {
    config: SessionConfig,
    voices: VoiceSet,
    grid: UnitGrid,
    assembler: Assembler,
    swing: f64,
    rng: RngContext,
    motifs: MotifEngine,
    tension: TensionTracker,
    fills: Vec<(usize, FillKind)>,
}

/// What one unit contributes before assembly.
struct UnitOutput {
    candidates: Vec<NoteCandidate>,
    fill: Option<FillKind>,
}

impl Session {
    /// Build a session, resolving voice pitches through the config's pitch map.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let resolver = config.pitch_overrides.clone();
        Self::with_resolver(config, &resolver)
    }

    /// Build a session with a host-supplied pitch resolver.
    pub fn with_resolver(config: SessionConfig, resolver: &dyn PitchResolver) -> Result<Self> {
        config.validate()?;
        let voices = VoiceSet::from_specs(&config.voices, resolver)?;
        let time_base = TimeBase::new(config.ticks_per_beat);
        let assembler = Assembler::new(ConstraintTable::new(time_base), config.channel);
        let roles: Vec<Role> = voices.roles().collect();
        assembler.check_unit(config.unit_duration_ticks, &roles)?;
        Ok(Self {
            grid: UnitGrid::new(config.unit_duration_ticks, config.steps_per_unit),
            swing: config.effective_swing(),
            rng: RngContext::new(config.seed),
            motifs: MotifEngine::new(),
            fills: Vec::new(),
            tension: TensionTracker::new(config.repetition_units, config.section_mode),
            voices,
            assembler,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn voices(&self) -> &VoiceSet {
        &self.voices
    }

    /// Units that ended in a fill during the last [`generate`](Self::generate).
    pub fn fills(&self) -> &[(usize, FillKind)] {
        &self.fills
    }

    /// Generate the whole sequence. Either every event or an error; never a
    /// partial list.
    pub fn generate(&mut self) -> Result<Vec<Event>> {
        self.rng = RngContext::new(self.config.seed);
        self.motifs = MotifEngine::new();
        self.fills.clear();
        self.tension = TensionTracker::new(self.config.repetition_units, self.config.section_mode);

        let total = self.config.repetition_units;
        tracing::info!(
            "generating {total} units of {} (seed {})",
            self.config.genre,
            self.config.seed
        );

        let mut candidates = Vec::new();
        let mut previous_fill = None;
        let mut after_fill = false;
        for unit in 0..total {
            let out = self.generate_unit(unit, previous_fill, after_fill)?;
            after_fill = out.fill.is_some();
            if let Some(kind) = out.fill {
                self.fills.push((unit, kind));
                previous_fill = Some(kind);
            }
            candidates.extend(out.candidates);
        }

        let events = self.assembler.assemble(candidates)?;
        tracing::info!("assembled {} events, {} fills", events.len(), self.fills.len());
        Ok(events)
    }

    /// Generate and hand the batch to `sink`. Nothing is inserted on error.
    pub fn generate_into(&mut self, sink: &mut dyn EventSink) -> Result<usize> {
        let events = self.generate()?;
        let count = events.len();
        sink.insert_batch(events);
        Ok(count)
    }

    fn generate_unit(
        &mut self,
        unit: usize,
        previous_fill: Option<FillKind>,
        after_fill: bool,
    ) -> Result<UnitOutput> {
        let total = self.config.repetition_units;
        let mode = self.config.section_mode;
        let section = section_for(unit, total, mode);

        let mut pattern = apply_blueprint(self.config.genre, unit, &self.grid, &mut self.rng)?;
        self.substitute_undeclared(&mut pattern);
        for role in self.voices.roles() {
            pattern.lane_mut(role);
        }

        shape_density(&mut pattern, &section, &mut self.rng);
        self.motifs.develop(&mut pattern, unit, &mut self.rng);
        pattern.enforce_core();
        apply_interactions(&mut pattern, unit, &mut self.rng);
        pattern.enforce_core();

        let tension = self.tension.tension_for(unit, total, &section);
        let section_end = is_last_before_change(unit, total, mode);
        let phrase_end = unit % PHRASE_UNITS == PHRASE_UNITS - 1;
        let fill = if self.rng.chance(fill_probability(&section, section_end, phrase_end)) {
            let ctx = FillContext {
                tension,
                voices: &self.voices,
                previous: previous_fill,
                available_ticks: self.grid.unit_ticks(),
            };
            let fill = select_fill(&ctx, &mut self.rng);
            self.clear_fill_window(&mut pattern, &fill);
            Some(fill)
        } else {
            None
        };
        self.tension.record_realized(pattern.density());
        tracing::debug!(
            "unit {unit}: {} tension {tension:.2}, fill {:?}",
            section.kind,
            fill.as_ref().map(|f| f.kind)
        );

        let mut candidates = self.lane_candidates(&pattern, unit);
        if let Some(fill) = &fill {
            candidates.extend(self.fill_candidates(&pattern, fill, unit));
        }
        if after_fill {
            candidates.extend(self.crash_candidate(&pattern, unit));
        }
        candidates.sort_by_key(|c| (c.role, c.step, c.start));

        let shaped = self.shape_candidates(candidates, unit, tension, &section);
        Ok(UnitOutput {
            candidates: shaped,
            fill: fill.map(|f| f.kind),
        })
    }

    /// Move lanes of undeclared roles onto their nearest declared substitute.
    fn substitute_undeclared(&self, pattern: &mut Pattern) {
        for role in pattern.roles() {
            if self.voices.contains(role) {
                continue;
            }
            if let Some(lane) = pattern.take_lane(role) {
                let substitute = self.voices.resolve_or_substitute(role).role;
                pattern.lane_mut(substitute).merge_variable(&lane);
            }
        }
    }

    fn clear_fill_window(&self, pattern: &mut Pattern, fill: &FillInstance) {
        let window_start = fill.window_start(self.grid.unit_ticks());
        let first_step = (0..self.grid.steps())
            .find(|&s| self.grid.step_offset(s) >= window_start)
            .unwrap_or(self.grid.steps());
        let mut roles = fill.roles();
        roles.extend(FILL_CLEARED_HATS);
        for role in roles {
            if let Some(lane) = pattern.existing_lane_mut(role) {
                for step in first_step..lane.steps() {
                    lane.clear_variable(step);
                }
            }
        }
    }

    fn note_duration(&self, length_steps: u8) -> u64 {
        let steps = (length_steps.max(1) as usize * self.config.note_length_steps) as f64;
        ((steps * self.grid.step_ticks()).round() as u64).max(1)
    }

    fn lane_candidates(&self, pattern: &Pattern, unit: usize) -> Vec<NoteCandidate> {
        let unit_start = self.grid.unit_start(unit);
        let unit_end = unit_start + self.grid.unit_ticks();
        let mut out = Vec::new();
        for (role, lane) in pattern.lanes() {
            let voice = self.voices.resolve_or_substitute(role);
            let (normal, _) = role.velocity_range();
            for step in lane.hits.hits() {
                let velocity = if lane.is_ghost(step) {
                    normal * GHOST_VELOCITY
                } else {
                    normal
                };
                out.push(NoteCandidate {
                    role: voice.role,
                    pitch: voice.pitch_for_degree(lane.degrees[step]),
                    start: (unit_start + self.grid.step_offset(step)) as i64,
                    duration: self.note_duration(lane.lengths[step]),
                    velocity,
                    core: lane.is_core(step),
                    unit,
                    step,
                    unit_end,
                });
            }
        }
        out
    }

    fn fill_candidates(&self, pattern: &Pattern, fill: &FillInstance, unit: usize) -> Vec<NoteCandidate> {
        let unit_ticks = self.grid.unit_ticks();
        let unit_start = self.grid.unit_start(unit);
        let window_start = fill.window_start(unit_ticks);
        let steps = self.grid.steps() as u64;
        fill.notes
            .iter()
            .filter_map(|note| {
                let offset = window_start + note.offset;
                let step = ((offset * steps) / unit_ticks.max(1)).min(steps - 1) as usize;
                let on_grid = self.grid.step_offset(step) == offset;
                let doubled = pattern.lane(note.role).is_some_and(|l| l.hits.get(step));
                if on_grid && doubled {
                    return None;
                }
                let (normal, _) = note.role.velocity_range();
                Some(NoteCandidate {
                    role: note.role,
                    pitch: note.pitch,
                    start: (unit_start + offset) as i64,
                    duration: self.note_duration(1),
                    velocity: normal * note.velocity_scale,
                    core: false,
                    unit,
                    step,
                    unit_end: unit_start + unit_ticks,
                })
            })
            .collect()
    }

    /// A crash on the downbeat after a fill, when the kit has one and the
    /// unit does not already open on a crash.
    fn crash_candidate(&self, pattern: &Pattern, unit: usize) -> Option<NoteCandidate> {
        let voice = self.voices.get(Role::Crash)?;
        if pattern.lane(Role::Crash).is_some_and(|l| l.hits.get(0)) {
            return None;
        }
        let (_, accent) = Role::Crash.velocity_range();
        let unit_start = self.grid.unit_start(unit);
        Some(NoteCandidate {
            role: Role::Crash,
            pitch: voice.pitch(),
            start: unit_start as i64,
            duration: self.note_duration(4),
            velocity: accent,
            core: false,
            unit,
            step: 0,
            unit_end: unit_start + self.grid.unit_ticks(),
        })
    }

    fn shape_candidates(
        &mut self,
        candidates: Vec<NoteCandidate>,
        unit: usize,
        tension: f64,
        section: &SectionContext,
    ) -> Vec<NoteCandidate> {
        let total = self.config.repetition_units;
        let feel = Feel {
            energy: tension,
            dynamics_offset: section.dynamics_offset,
        };
        let structure_position = if total <= 1 {
            0.0
        } else {
            unit as f64 / (total - 1) as f64
        };
        let surprise_ctx = SurpriseContext {
            enabled: &self.config.surprises,
            structure_position,
            grid: &self.grid,
            voices: &self.voices,
            constraints: self.assembler.constraints(),
        };

        let mut out = Vec::with_capacity(candidates.len());
        for mut c in candidates {
            apply_swing(&mut c, self.swing, &self.grid);
            if self.config.humanization_enabled {
                humanize(&mut c, &feel, &self.grid, &mut self.rng);
                out.extend(maybe_surprise(c, &surprise_ctx, &mut self.rng));
            } else {
                apply_dynamics(&mut c, &feel, &self.grid);
                out.push(c);
            }
        }
        out
    }
}
