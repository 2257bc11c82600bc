use std::{cell::RefCell, collections::HashSet, rc::Rc, time::Duration};

use breath_garden_core::{
    seeded, ConfigError, FlowerId, GroupId, GrowthObserver, ManualClock, SpeciesConfig, StemId,
};
use breath_garden_manager::{Collaborators, PlantManager};

const BASE: (f32, f32) = (400.0, 560.0);

#[derive(Clone, Debug, PartialEq)]
enum Notification {
    Stem(StemId),
    Flower(FlowerId),
}

#[derive(Clone, Default)]
struct Recorder {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl Recorder {
    fn stems(&self) -> Vec<StemId> {
        self.log
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                Notification::Stem(id) => Some(*id),
                Notification::Flower(_) => None,
            })
            .collect()
    }

    fn flowers(&self) -> Vec<FlowerId> {
        self.log
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                Notification::Flower(id) => Some(*id),
                Notification::Stem(_) => None,
            })
            .collect()
    }
}

impl GrowthObserver for Recorder {
    fn on_stem_created(&mut self, _x: f32, _y: f32, id: StemId) {
        self.log.borrow_mut().push(Notification::Stem(id));
    }

    fn on_flower_created(&mut self, _x: f32, _y: f32, id: FlowerId) {
        self.log.borrow_mut().push(Notification::Flower(id));
    }
}

fn recorded(config: SpeciesConfig, seed: u64) -> (PlantManager, Recorder) {
    let recorder = Recorder::default();
    let collaborators = Collaborators::for_config(&config)
        .with_rng(seeded(seed))
        .with_observer(recorder.clone());
    let manager = PlantManager::with_collaborators(config, collaborators).expect("valid config");
    (manager, recorder)
}

/// One breath per 60 ticks: a strong inhale followed by a quiet exhale.
fn breath(tick: usize) -> f32 {
    if tick % 60 < 35 {
        0.6
    } else {
        0.05
    }
}

fn run(manager: &mut PlantManager, ticks: usize) {
    for tick in 0..ticks {
        let force = breath(tick);
        manager.process_stem_growth(force);
        manager.process_leaves_growth(force);
        manager.process_flower_growth(force);
    }
}

fn heights(manager: &PlantManager) -> Vec<f32> {
    manager
        .snapshot()
        .stems()
        .iter()
        .map(|stem| stem.current_height())
        .collect()
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut config = SpeciesConfig::generic_flower();
    config.max_groups = 0;
    assert!(matches!(
        PlantManager::new(config),
        Err(ConfigError::NoGroups)
    ));
}

#[test]
fn initialize_plants_once() {
    let (mut manager, recorder) = recorded(SpeciesConfig::lupin(), 1);
    manager.initialize(BASE.0, BASE.1);
    let stems = manager.snapshot().stems().len();
    assert!(stems > 0);

    manager.initialize(10.0, 10.0);
    assert_eq!(manager.snapshot().stems().len(), stems);
    assert_eq!(recorder.stems().len(), stems);
    assert_eq!(manager.group_count(), 1);
    assert!(manager
        .snapshot()
        .stems()
        .iter()
        .all(|stem| stem.base().1 == BASE.1));
}

#[test]
fn initialize_keeps_the_ground_line_on_screen() {
    let (mut manager, _) = recorded(SpeciesConfig::rose(), 9);
    manager.set_screen_size(800.0, 600.0);
    manager.initialize(BASE.0, 900.0);

    let snapshot = manager.snapshot();
    assert!(!snapshot.stems().is_empty());
    assert!(snapshot.stems().iter().all(|stem| stem.base().1 == 600.0));
}

#[test]
fn ticks_before_initialize_do_nothing() {
    let (mut manager, recorder) = recorded(SpeciesConfig::rose(), 2);
    run(&mut manager, 200);

    assert!(manager.snapshot().is_empty());
    assert_eq!(manager.saccade_count(), 0);
    assert!(recorder.log.borrow().is_empty());
}

#[test]
fn nothing_grows_before_the_first_saccade() {
    let (mut manager, _) = recorded(SpeciesConfig::generic_flower(), 3);
    manager.initialize(BASE.0, BASE.1);

    for _ in 0..120 {
        manager.process_stem_growth(0.25);
        manager.process_leaves_growth(0.25);
        manager.process_flower_growth(0.25);
    }

    assert_eq!(manager.active_group(), None);
    assert!(heights(&manager).iter().all(|height| *height == 0.0));
}

#[test]
fn growth_is_monotonic_and_confined_to_the_active_group() {
    let (mut manager, _) = recorded(SpeciesConfig::lupin(), 4);
    manager.initialize(BASE.0, BASE.1);

    let mut previous = heights(&manager);
    for tick in 0..1_200 {
        let force = breath(tick);
        manager.process_stem_growth(force);
        manager.process_leaves_growth(force);
        manager.process_flower_growth(force);

        let snapshot = manager.snapshot();
        let active = manager.active_group();
        for (index, stem) in snapshot.stems().iter().enumerate() {
            let height = stem.current_height();
            assert!(height <= stem.max_height());
            if let Some(before) = previous.get(index) {
                assert!(height >= *before, "stem {index} shrank");
                if height > *before {
                    assert_eq!(Some(stem.group()), active);
                }
            }
        }
        previous = heights(&manager);
    }

    assert!(manager.saccade_count() > 0);
}

#[test]
fn structural_growth_is_bounded_by_the_pool() {
    let config = SpeciesConfig::generic_flower();
    let max_groups = config.max_groups;
    let stems_max = config.stem.stems_per_group_max as usize;
    let (mut manager, _) = recorded(config, 5);
    manager.initialize(BASE.0, BASE.1);

    run(&mut manager, 60 * 20);

    assert_eq!(manager.saccade_count(), 20);
    assert_eq!(manager.group_count(), max_groups);
    assert!(manager.snapshot().stems().len() <= max_groups * stems_max);
}

#[test]
fn saccades_follow_the_injected_clock() {
    let config = SpeciesConfig::generic_flower();
    let clock = ManualClock::new();
    let collaborators = Collaborators::for_config(&config).with_clock(clock.clone());
    let mut manager = PlantManager::with_collaborators(config, collaborators).expect("valid");
    manager.initialize(BASE.0, BASE.1);

    for (force, millis) in [(0.0, 0), (0.35, 50), (0.35, 400), (0.1, 450), (0.35, 800)] {
        clock.set(Duration::from_millis(millis));
        manager.process_stem_growth(force);
    }

    assert_eq!(manager.saccade_count(), 2);
    assert!(manager.active_group().is_some());
}

#[test]
fn flowers_are_announced_once_when_visible() {
    let (mut manager, recorder) = recorded(SpeciesConfig::lupin(), 6);
    manager.initialize(BASE.0, BASE.1);
    run(&mut manager, 3_000);

    let announced = recorder.flowers();
    assert!(!announced.is_empty(), "expected some flowers to open");
    let unique: HashSet<_> = announced.iter().copied().collect();
    assert_eq!(unique.len(), announced.len());

    let visible = manager
        .snapshot()
        .flowers()
        .filter(|flower| flower.is_visible())
        .count();
    assert_eq!(visible, announced.len());
}

#[test]
fn reset_clears_the_plant_but_keeps_screen_and_ids() {
    let (mut manager, recorder) = recorded(SpeciesConfig::orchid(), 7);
    manager.set_screen_size(800.0, 600.0);
    manager.initialize(BASE.0, BASE.1);
    run(&mut manager, 600);
    let before_reset = recorder.stems();

    manager.reset();
    assert!(manager.snapshot().is_empty());
    assert!(manager.snapshot().leaves().is_empty());
    assert_eq!(manager.snapshot().flowers().count(), 0);
    assert_eq!(manager.saccade_count(), 0);
    assert_eq!(manager.active_group(), None);
    assert!(!manager.is_initialized());
    assert!(manager.screen().is_some());

    manager.initialize(BASE.0, BASE.1);
    let newest = manager.snapshot().stems()[0].id();
    assert!(before_reset.iter().all(|id| *id < newest));
    assert_eq!(manager.group_count(), 1);
    assert_eq!(manager.active_group(), None);
}

#[test]
fn reactivating_the_initial_group_plants_nothing_new() {
    let config = SpeciesConfig::generic_flower();
    let (mut manager, _) = recorded(config, 8);
    manager.initialize(BASE.0, BASE.1);

    let mut seen_initial = false;
    for pulse in 0..7 {
        let groups_before = manager.group_count();
        run_pulse(&mut manager);
        if manager.active_group() == Some(GroupId::INITIAL) {
            seen_initial = true;
            assert_eq!(manager.group_count(), groups_before, "pulse {pulse}");
        } else {
            assert_eq!(manager.group_count(), groups_before + 1, "pulse {pulse}");
        }
    }
    assert!(seen_initial);
}

fn run_pulse(manager: &mut PlantManager) {
    for tick in 0..60 {
        let force = breath(tick);
        manager.process_stem_growth(force);
        manager.process_leaves_growth(force);
        manager.process_flower_growth(force);
    }
}
