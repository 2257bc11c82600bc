use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use breath_garden_core::{seeded, Species, SpeciesConfig};
use breath_garden_manager::{Collaborators, PlantManager};

#[test]
fn identical_seeds_replay_identically() {
    for species in Species::ALL {
        let first = replay(species.config(), 0x5eed);
        let second = replay(species.config(), 0x5eed);
        assert_eq!(first, second, "{species:?} replay diverged between runs");
        assert!(first.stems > 0);
    }
}

#[test]
fn different_seeds_grow_different_plants() {
    let first = replay(SpeciesConfig::lupin(), 1);
    let second = replay(SpeciesConfig::lupin(), 2);
    assert_ne!(first.fingerprint, second.fingerprint);
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    stems: usize,
    leaves: usize,
    flowers: usize,
    saccades: usize,
    fingerprint: u64,
}

fn replay(config: SpeciesConfig, seed: u64) -> ReplayOutcome {
    let collaborators = Collaborators::for_config(&config).with_rng(seeded(seed));
    let mut manager = PlantManager::with_collaborators(config, collaborators).expect("valid");
    manager.set_screen_size(1_024.0, 768.0);
    manager.initialize(512.0, 720.0);

    for force in scripted_breath() {
        manager.process_stem_growth(force);
        manager.process_leaves_growth(force);
        manager.process_flower_growth(force);
    }

    let snapshot = manager.snapshot();
    let mut hasher = DefaultHasher::new();
    for stem in snapshot.stems() {
        stem.id().hash(&mut hasher);
        stem.group().hash(&mut hasher);
        stem.current_height().to_bits().hash(&mut hasher);
        for point in stem.points() {
            point.x.to_bits().hash(&mut hasher);
            point.y.to_bits().hash(&mut hasher);
            point.thickness.to_bits().hash(&mut hasher);
        }
        for shoot in stem.shoots() {
            shoot.id().hash(&mut hasher);
            shoot.current_height().to_bits().hash(&mut hasher);
        }
    }
    for leaf in snapshot.leaves() {
        leaf.host().hash(&mut hasher);
        leaf.attach_height().to_bits().hash(&mut hasher);
        leaf.current_size().to_bits().hash(&mut hasher);
    }
    for flower in snapshot.flowers() {
        flower.id().hash(&mut hasher);
        flower.color().hash(&mut hasher);
        flower.position().0.to_bits().hash(&mut hasher);
        flower.current_size().to_bits().hash(&mut hasher);
    }

    ReplayOutcome {
        stems: snapshot.stems().len(),
        leaves: snapshot.leaves().len(),
        flowers: snapshot.flowers().count(),
        saccades: manager.saccade_count(),
        fingerprint: hasher.finish(),
    }
}

/// Irregular breathing: uneven inhale lengths, a noisy plateau and long pauses.
fn scripted_breath() -> Vec<f32> {
    let mut samples = Vec::new();
    for cycle in 0..24 {
        let inhale = 20 + (cycle * 7) % 25;
        for tick in 0..inhale {
            let wobble = if tick % 3 == 0 { 0.08 } else { 0.0 };
            samples.push(0.45 + wobble + (cycle % 4) as f32 * 0.05);
        }
        let pause = 15 + (cycle * 11) % 30;
        samples.extend(std::iter::repeat(0.02).take(pause));
    }
    samples
}
