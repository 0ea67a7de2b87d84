//! Building-block integration tests — Euclidean skeletons, motif memory,
//! tension and fill tiers working together.

use backbeat::fill::{fill_tier, select_fill, FillContext};
use backbeat::motif::{transform, Motif, MotifCell, MotifEngine, Transformation, HISTORY_CAPACITY};
use backbeat::rhythm::euclid;
use backbeat::rng::RngContext;
use backbeat::section::{section_for, SectionMode, TensionTracker};
use backbeat::voice::{PitchMap, Role, VoiceSet, VoiceSpec};

// =============================================================================
// Euclidean generator
// =============================================================================

#[test]
fn four_on_sixteen() {
    assert_eq!(euclid(16, 4, 0).unwrap().hits(), vec![0, 4, 8, 12]);
}

#[test]
fn tresillo() {
    assert_eq!(euclid(8, 3, 0).unwrap().hits(), vec![0, 3, 6]);
}

#[test]
fn rotation_moves_hits_later() {
    assert_eq!(euclid(8, 3, 1).unwrap().hits(), vec![1, 4, 7]);
    assert_eq!(euclid(8, 3, 9).unwrap(), euclid(8, 3, 1).unwrap());
}

#[test]
fn invalid_euclid_parameters() {
    assert!(euclid(0, 0, 0).is_err());
    assert!(euclid(4, 5, 0).is_err());
    assert_eq!(euclid(5, 0, 2).unwrap().hit_count(), 0);
    assert_eq!(euclid(5, 5, 2).unwrap().hit_count(), 5);
}

// =============================================================================
// Motif engine
// =============================================================================

fn three_cell() -> Motif {
    Motif::new(
        Role::Cowbell,
        vec![
            MotifCell::pitched(0, 0, 1),
            MotifCell::pitched(1, 3, 1),
            MotifCell::pitched(2, 5, 2),
        ],
    )
    .unwrap()
}

#[test]
fn retrograde_reverses_a_stored_motif() {
    let mut engine = MotifEngine::new();
    engine.store(Role::Cowbell, three_cell()).unwrap();
    let stored = engine.history(Role::Cowbell).unwrap().get(0).unwrap();
    let reversed = transform(stored, Transformation::Retrograde, &mut RngContext::new(0));
    let original: Vec<_> = stored.cells().iter().map(|c| (c.hit, c.degree, c.length)).collect();
    let mut expected = original.clone();
    expected.reverse();
    let got: Vec<_> = reversed.cells().iter().map(|c| (c.hit, c.degree, c.length)).collect();
    assert_eq!(got, expected);
    assert_eq!(engine.history(Role::Cowbell).unwrap().get(0), Some(&three_cell()));
}

#[test]
fn history_is_bounded_per_role() {
    let mut engine = MotifEngine::new();
    for i in 1..=9u8 {
        let m = Motif::new(Role::Snare, vec![MotifCell::hit(0), MotifCell::hit(i)]).unwrap();
        engine.store(Role::Snare, m).unwrap();
    }
    assert_eq!(engine.history(Role::Snare).unwrap().len(), HISTORY_CAPACITY);
    assert!(engine.history(Role::Kick).is_none());
}

#[test]
fn recall_probability_grows_with_unit_index() {
    let mut engine = MotifEngine::new();
    engine.store(Role::Cowbell, three_cell()).unwrap();
    let count = |unit: usize| {
        (0..400)
            .filter(|&s| engine.recall(Role::Cowbell, unit, &mut RngContext::new(s)).is_some())
            .count()
    };
    assert_eq!(count(0), 0);
    let second = count(1);
    let later = count(5);
    assert!(second > 150 && second < 250, "{second}");
    assert!(later > second);
}

// =============================================================================
// Tension and fills
// =============================================================================

#[test]
fn tension_drives_fill_tiers() {
    let voices = VoiceSet::from_specs(
        &[
            VoiceSpec::new("kick", Role::Kick),
            VoiceSpec::new("snare", Role::Snare),
        ],
        &PitchMap::default(),
    )
    .unwrap();
    let total = 16;
    let mut tracker = TensionTracker::new(total, SectionMode::Auto);
    let mut rng = RngContext::new(12);
    let mut previous = None;
    for unit in 0..total {
        let section = section_for(unit, total, SectionMode::Auto);
        let tension = tracker.tension_for(unit, total, &section);
        assert!((0.0..=1.0).contains(&tension));
        let fill = select_fill(
            &FillContext {
                tension,
                voices: &voices,
                previous,
                available_ticks: 3840,
            },
            &mut rng,
        );
        assert_eq!(fill.tier, fill_tier(tension));
        assert!(fill.notes.iter().all(|n| voices.contains(n.role)));
        previous = Some(fill.kind);
        tracker.record_realized(0.3);
    }
}
