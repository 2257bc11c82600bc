use std::time::Duration;

use breath_garden_core::{seeded, BreathTuning, GroupId};
use breath_garden_system_saccade::{ActivationOrderPool, BreathPhase, SaccadeDetector};

fn feed(detector: &mut SaccadeDetector, samples: &[(f32, u64)]) -> Vec<usize> {
    samples
        .iter()
        .filter_map(|&(force, millis)| detector.observe(force, Duration::from_millis(millis)))
        .map(|event| event.saccade_count())
        .collect()
}

#[test]
fn scripted_breath_produces_two_saccades() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let fired = feed(
        &mut detector,
        &[(0.0, 0), (0.35, 50), (0.35, 400), (0.1, 450), (0.35, 800)],
    );

    assert_eq!(fired, vec![1, 2]);
    assert_eq!(detector.last_saccade(), Some(Duration::from_millis(800)));
    assert_eq!(detector.phase(), BreathPhase::Breathing);
}

#[test]
fn dead_band_never_fires() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let samples: Vec<(f32, u64)> = (0..200u64)
        .map(|tick| {
            let force = if tick % 2 == 0 { 0.21 } else { 0.29 };
            (force, tick * 500)
        })
        .collect();

    assert!(feed(&mut detector, &samples).is_empty());
    assert_eq!(detector.saccade_count(), 0);
}

#[test]
fn oscillation_inside_the_band_keeps_breathing() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let fired = feed(
        &mut detector,
        &[(0.4, 0), (0.25, 400), (0.4, 800), (0.21, 1_200), (0.4, 1_600)],
    );

    assert_eq!(fired, vec![1]);
}

#[test]
fn cooldown_collapses_two_edges_into_one_event() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let fired = feed(
        &mut detector,
        &[(0.4, 0), (0.1, 100), (0.4, 200), (0.1, 250)],
    );

    assert_eq!(fired, vec![1]);
    assert_eq!(detector.phase(), BreathPhase::Idle);
}

#[test]
fn blocked_edge_fires_once_cooldown_elapses() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let fired = feed(
        &mut detector,
        &[(0.4, 0), (0.1, 100), (0.4, 200), (0.4, 300), (0.4, 316)],
    );

    assert_eq!(fired, vec![1, 2]);
    assert_eq!(detector.last_saccade(), Some(Duration::from_millis(316)));
}

#[test]
fn invalid_force_counts_as_silence() {
    let mut detector = SaccadeDetector::new(&BreathTuning::default());
    let fired = feed(
        &mut detector,
        &[(f32::NAN, 0), (f32::INFINITY, 50), (-3.0, 100), (0.4, 150), (f32::NAN, 200)],
    );

    assert_eq!(fired, vec![1]);
    assert_eq!(detector.phase(), BreathPhase::Idle);
}

#[test]
fn pool_is_a_permutation() {
    let mut rng = seeded(99);
    let pool = ActivationOrderPool::new(7, &mut rng);

    let mut ids: Vec<u32> = pool.order().iter().map(GroupId::get).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..7).collect::<Vec<_>>());
    assert_eq!(pool.len(), 7);
}

#[test]
fn pool_lookups_past_the_end_are_empty() {
    let mut rng = seeded(3);
    let pool = ActivationOrderPool::new(2, &mut rng);

    assert!(pool.get(0).is_none());
    assert!(pool.get(1).is_some());
    assert!(pool.get(2).is_some());
    assert!(pool.get(3).is_none());
    assert!(pool.get(usize::MAX).is_none());
}

#[test]
fn identical_seeds_shuffle_identically() {
    let first = ActivationOrderPool::new(7, &mut seeded(5));
    let second = ActivationOrderPool::new(7, &mut seeded(5));
    assert_eq!(first.order(), second.order());
}
