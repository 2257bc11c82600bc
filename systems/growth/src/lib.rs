#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Growth allocation for primary stems and basal shoots.
//!
//! Primary growth is restricted to the stems of the active group. Each tick
//! the allocator scores the steadiness of the breath, eases the increment out
//! as the stem nears its cap and subdivides the new length into jittered
//! polyline segments.

use breath_garden_core::{
    sanitize_force, Command, RandomSource, SegmentCursor, ShootTuning, SpeciesConfig, StemPoint,
    StemTuning,
};
use breath_garden_world::{query, BasalShoot, PlantState, Stem};

const MAX_FORCE_DELTA: f32 = 0.5;
const MIN_SEGMENT_LENGTH: f32 = 0.5;
const SHOOT_JITTER_FACTOR: f32 = 0.5;
const TERMINAL_SNAP: f32 = 1e-3;

/// Computes the height gained by an axis in one tick.
///
/// `rate` folds the growth rate, tick scale and per-axis speed multiplier.
/// The result never lifts `current` above `max`.
#[must_use]
pub fn growth_increment(force: f32, last_force: f32, current: f32, max: f32, rate: f32) -> f32 {
    if !(max > 0.0) || current >= max {
        return 0.0;
    }

    let delta = (force - last_force).abs().min(MAX_FORCE_DELTA);
    let stability = 1.0 - delta * 2.0;
    let quality = 0.5 + stability * 0.5;
    let progress = current / max;
    let curve = 1.0 - progress * progress;

    let increment = force * quality * curve * rate;
    if increment.is_nan() {
        return 0.0;
    }
    increment.clamp(0.0, max - current)
}

// Snaps to the cap once the remaining gap is within rounding distance.
fn advance(current: f32, increment: f32, max: f32) -> f32 {
    let height = (current + increment).min(max);
    if max - height < TERMINAL_SNAP {
        max
    } else {
        height
    }
}

/// Pure system that emits stem and basal shoot extension commands.
#[derive(Clone, Debug)]
pub struct GrowthAllocator {
    force_threshold: f32,
    stem: StemTuning,
    shoot: ShootTuning,
}

impl GrowthAllocator {
    /// Creates the allocator from the species configuration.
    #[must_use]
    pub fn new(config: &SpeciesConfig) -> Self {
        Self {
            force_threshold: config.breath.force_threshold,
            stem: config.stem.clone(),
            shoot: config.shoot.clone(),
        }
    }

    /// Emits one tick of growth for the provided force sample.
    ///
    /// Stems grow only while their group is active. Basal shoots grow
    /// whenever the force clears the threshold, whatever their parent's group
    /// or height.
    pub fn handle(
        &self,
        state: &PlantState,
        force: f32,
        last_force: f32,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        let force = sanitize_force(force);
        let last_force = sanitize_force(last_force);
        if force <= self.force_threshold {
            return;
        }

        if let Some(group) = query::active_group(state) {
            for (stem_index, stem) in query::stems_in_group(state, group) {
                if stem.is_terminal() {
                    continue;
                }
                if let Some(command) = self.grow_stem(stem_index, stem, force, last_force, rng) {
                    out.push(command);
                }
            }
        }

        for (stem_index, stem) in query::stems(state).iter().enumerate() {
            for (shoot_index, shoot) in stem.shoots().iter().enumerate() {
                if shoot.is_terminal() {
                    continue;
                }
                if let Some(command) =
                    self.grow_shoot(stem_index, shoot_index, shoot, force, last_force, rng)
                {
                    out.push(command);
                }
            }
        }
    }

    fn grow_stem(
        &self,
        stem_index: usize,
        stem: &Stem,
        force: f32,
        last_force: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<Command> {
        let rate = self.stem.growth_rate * self.stem.tick_scale * stem.growth_speed_multiplier();
        let increment = growth_increment(
            force,
            last_force,
            stem.current_height(),
            stem.max_height(),
            rate,
        );
        if !(increment > 0.0) {
            return None;
        }

        let height = advance(stem.current_height(), increment, stem.max_height());
        let (base_x, base_y) = stem.base();
        let lean = stem.lean();
        let (points, cursor) = self.lay_segments(
            stem.cursor(),
            height,
            stem.max_height(),
            self.stem.jitter,
            rng,
            |h| StemPoint::new(base_x + lean * h, base_y - h, stem.thickness_at(h)),
        );

        Some(Command::ExtendStem {
            stem_index,
            height,
            points,
            cursor,
        })
    }

    fn grow_shoot(
        &self,
        stem_index: usize,
        shoot_index: usize,
        shoot: &BasalShoot,
        force: f32,
        last_force: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<Command> {
        let rate =
            self.shoot.growth_rate * self.stem.tick_scale * shoot.growth_speed_multiplier();
        let increment = growth_increment(
            force,
            last_force,
            shoot.current_height(),
            shoot.max_height(),
            rate,
        );
        if !(increment > 0.0) {
            return None;
        }

        let height = advance(shoot.current_height(), increment, shoot.max_height());
        let (base_x, base_y) = shoot.base();
        let (sin, cos) = shoot.angle().sin_cos();
        let (points, cursor) = self.lay_segments(
            shoot.cursor(),
            height,
            shoot.max_height(),
            self.stem.jitter * SHOOT_JITTER_FACTOR,
            rng,
            |h| StemPoint::new(base_x + sin * h, base_y - cos * h, shoot.thickness_at(h)),
        );

        Some(Command::ExtendShoot {
            stem_index,
            shoot_index,
            height,
            points,
            cursor,
        })
    }

    fn lay_segments(
        &self,
        mut cursor: SegmentCursor,
        height: f32,
        max_height: f32,
        jitter: f32,
        rng: &mut dyn RandomSource,
        point_at: impl Fn(f32) -> StemPoint,
    ) -> (Vec<StemPoint>, SegmentCursor) {
        let mut points = Vec::new();
        let mut jittered = |h: f32, rng: &mut dyn RandomSource| {
            let mut point = point_at(h);
            point.x += rng.signed(jitter);
            points.push(point);
        };

        loop {
            let step = cursor.next_segment_length.max(MIN_SEGMENT_LENGTH);
            let next = cursor.last_point_height + step;
            if next > height {
                break;
            }
            jittered(next, &mut *rng);
            cursor.last_point_height = next;
            cursor.next_segment_length =
                rng.range(self.stem.segment_length_min, self.stem.segment_length_max);
        }

        if height >= max_height && cursor.last_point_height < height {
            jittered(height, &mut *rng);
            cursor.last_point_height = height;
        }

        (points, cursor)
    }
}
