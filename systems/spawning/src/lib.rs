#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Threshold-triggered spawning of leaves and flowers.
//!
//! Each spawn rule fires at most once per host and category: stem leaves,
//! sub-floral leaves, basal shoot leaves and flower spikes. Spawned
//! sub-structures then grow every tick the breath is strong enough,
//! regardless of which group holds the primary growth turn.

mod genetics;

use breath_garden_core::{
    sanitize_force, Command, FlowerBlueprint, FlowerTuning, IdAllocator, LeafHost, LeafPlacement,
    LeafRole, LeafSide, LeafTuning, RandomSource, SpeciesConfig,
};
use breath_garden_world::{query, PlantState, Stem};

pub use genetics::{draw_color, sample_genetics, PaletteDraw};

const STEM_LEAF_SPAN: (f32, f32) = (0.12, 0.7);
const SUB_FLORAL_SPAN: (f32, f32) = (0.75, 0.92);
const SHOOT_LEAF_SPAN: (f32, f32) = (0.3, 0.9);
const LEAF_ANGLE: (f32, f32) = (0.5, 1.1);
const SPIKE_TAPER: f32 = 0.5;

/// Pure system owning the leaf and flower spawn rules.
#[derive(Clone, Debug)]
pub struct SubStructureSpawner {
    force_threshold: f32,
    tall_stem_height: f32,
    leaf: LeafTuning,
    flower: FlowerTuning,
}

impl SubStructureSpawner {
    /// Creates the spawner from the species configuration.
    #[must_use]
    pub fn new(config: &SpeciesConfig) -> Self {
        Self {
            force_threshold: config.breath.force_threshold,
            tall_stem_height: config.stem.tall_stem_height,
            leaf: config.leaf.clone(),
            flower: config.flower.clone(),
        }
    }

    /// Runs the leaf spawn rules followed by the leaf grow pass.
    pub fn handle_leaves(
        &self,
        state: &PlantState,
        force: f32,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        self.spawn_leaves(state, rng, out);
        self.grow_leaves(state, force, out);
    }

    /// Runs the flower spawn rule followed by the flower grow pass.
    pub fn handle_flowers(
        &self,
        state: &PlantState,
        force: f32,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        self.spawn_flowers(state, ids, rng, out);
        self.grow_flowers(state, force, out);
    }

    /// Emits one batch per host and leaf role whose threshold was crossed.
    pub fn spawn_leaves(
        &self,
        state: &PlantState,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        for (stem_index, stem) in query::stems(state).iter().enumerate() {
            let host = LeafHost::stem(stem_index);

            if stem.current_height() > self.leaf.stem_leaf_min_height
                && !query::has_leaves(state, host, LeafRole::Stem)
            {
                let count = if stem.max_height() >= self.tall_stem_height {
                    self.leaf.leaves_per_tall_stem
                } else {
                    self.leaf.leaves_per_stem
                };
                self.push_batch(host, LeafRole::Stem, count, STEM_LEAF_SPAN, 1.0, rng, out);
            }

            if stem.spike().has_started_blooming()
                && !query::has_leaves(state, host, LeafRole::SubFloral)
            {
                let count = self.leaf.sub_floral_leaves;
                self.push_batch(
                    host,
                    LeafRole::SubFloral,
                    count,
                    SUB_FLORAL_SPAN,
                    1.0,
                    rng,
                    out,
                );
            }

            for (shoot_index, shoot) in stem.shoots().iter().enumerate() {
                let host = LeafHost::shoot(stem_index, shoot_index);
                if shoot.current_height() <= self.leaf.shoot_leaf_min_height
                    || query::has_leaves(state, host, LeafRole::BasalShoot)
                {
                    continue;
                }
                let count = rng.count(self.leaf.shoot_leaves_min, self.leaf.shoot_leaves_max);
                self.push_batch(
                    host,
                    LeafRole::BasalShoot,
                    count,
                    SHOOT_LEAF_SPAN,
                    self.leaf.shoot_size_multiplier,
                    rng,
                    out,
                );
            }
        }
    }

    /// Grows every spawned leaf when the breath exceeds the force threshold.
    pub fn grow_leaves(&self, state: &PlantState, force: f32, out: &mut Vec<Command>) {
        let force = sanitize_force(force);
        if force <= self.force_threshold || query::leaves(state).is_empty() {
            return;
        }
        out.push(Command::GrowLeaves {
            increment: force * self.leaf.growth_rate,
        });
    }

    /// Starts blooming on every stem past the bloom height that has not bloomed yet.
    pub fn spawn_flowers(
        &self,
        state: &PlantState,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        for (stem_index, stem) in query::stems(state).iter().enumerate() {
            if stem.spike().has_started_blooming() {
                continue;
            }
            let bloom_height = stem.max_height() * self.flower.bloom_height_fraction;
            if stem.current_height() <= bloom_height {
                continue;
            }

            let flowers = self.spike_flowers(stem, ids, rng);
            out.push(Command::StartBlooming {
                stem_index,
                flowers,
            });
        }
    }

    /// Grows every spawned flower when the breath exceeds the force threshold.
    pub fn grow_flowers(&self, state: &PlantState, force: f32, out: &mut Vec<Command>) {
        let force = sanitize_force(force);
        if force <= self.force_threshold || query::flowers(state).next().is_none() {
            return;
        }
        out.push(Command::GrowFlowers {
            increment: force * self.flower.growth_rate,
            visibility_fraction: self.flower.visibility_fraction,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn push_batch(
        &self,
        host: LeafHost,
        role: LeafRole,
        count: u32,
        span: (f32, f32),
        size_multiplier: f32,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        if count == 0 {
            return;
        }

        let slot = (span.1 - span.0) / count as f32;
        let first_side = rng.index(2);
        let leaves = (0..count as usize)
            .map(|index| {
                let centre = span.0 + slot * (index as f32 + 0.5);
                LeafPlacement {
                    height_ratio: (centre + rng.signed(slot * 0.25)).clamp(0.0, 1.0),
                    max_size: rng.range(self.leaf.max_size_min, self.leaf.max_size_max)
                        * size_multiplier,
                    angle: rng.range(LEAF_ANGLE.0, LEAF_ANGLE.1),
                    side: LeafSide::alternating(index + first_side),
                }
            })
            .collect();

        out.push(Command::SpawnLeaves { host, role, leaves });
    }

    fn spike_flowers(
        &self,
        stem: &Stem,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
    ) -> Vec<FlowerBlueprint> {
        let count = self.flower.flowers_per_spike as usize;
        if count == 0 {
            return Vec::new();
        }

        let tip = stem.tip();
        let length = stem.spike().max_length();
        let spacing = length / count as f32;

        (0..count)
            .map(|index| {
                let along = spacing * (index as f32 + 0.5);
                let progress = along / length.max(f32::EPSILON);
                let side = if index % 2 == 0 { -1.0 } else { 1.0 };
                let spread = self.flower.spike_spread * (1.0 - progress * SPIKE_TAPER);

                let genetics = if self.flower.genetics {
                    Some(sample_genetics(rng, &self.flower.palettes))
                } else {
                    None
                };
                let (color, size_factor) = match &genetics {
                    Some(genetics) => (genetics.color, genetics.size.size_factor()),
                    None => (draw_color(rng, &self.flower.palettes).color, 1.0),
                };
                let max_size =
                    rng.range(self.flower.max_size_min, self.flower.max_size_max) * size_factor;

                FlowerBlueprint {
                    id: ids.next_flower(),
                    x: tip.x + stem.lean() * along + side * spread,
                    y: tip.y - along,
                    max_size,
                    color,
                    genetics,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breath_garden_core::seeded;

    #[test]
    fn empty_batches_are_not_emitted() {
        let spawner = SubStructureSpawner::new(&SpeciesConfig::generic_flower());
        let mut rng = seeded(1);
        let mut out = Vec::new();
        spawner.push_batch(
            LeafHost::stem(0),
            LeafRole::SubFloral,
            0,
            SUB_FLORAL_SPAN,
            1.0,
            &mut rng,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn batches_spread_across_their_span() {
        let spawner = SubStructureSpawner::new(&SpeciesConfig::generic_flower());
        let mut rng = seeded(4);
        let mut out = Vec::new();
        spawner.push_batch(
            LeafHost::stem(0),
            LeafRole::Stem,
            5,
            STEM_LEAF_SPAN,
            1.0,
            &mut rng,
            &mut out,
        );

        let Some(Command::SpawnLeaves { leaves, .. }) = out.first() else {
            panic!("expected a leaf batch");
        };
        assert_eq!(leaves.len(), 5);
        for pair in leaves.windows(2) {
            assert!(pair[0].height_ratio < pair[1].height_ratio);
            assert_ne!(pair[0].side, pair[1].side);
        }
        assert!(leaves
            .iter()
            .all(|leaf| (STEM_LEAF_SPAN.0..=STEM_LEAF_SPAN.1).contains(&leaf.height_ratio)));
    }
}
