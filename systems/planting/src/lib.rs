#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Planting system resolving activation groups into stem blueprints.
//!
//! Every random draw that shapes a new group (stem count, base positions,
//! heights, lean, basal shoots) happens here, so the plant state only ever
//! receives fully resolved [`StemBlueprint`] values.

use breath_garden_core::{
    Activation, Command, GroupId, IdAllocator, RandomSource, ShootBlueprint, ShootTuning,
    SpeciesConfig, StemBlueprint, StemTuning,
};

/// Canvas dimensions used to keep new groups on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    width: f32,
    height: f32,
}

impl Screen {
    /// Creates a new screen description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the canvas.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the canvas.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    fn clamp_x(&self, x: f32, margin: f32) -> f32 {
        if !(self.width > 0.0) {
            return x;
        }
        let low = margin.max(0.0);
        let high = self.width - low;
        if high < low {
            self.width * 0.5
        } else {
            x.clamp(low, high)
        }
    }

    fn clamp_y(&self, y: f32) -> f32 {
        if !(self.height > 0.0) {
            return y;
        }
        y.clamp(0.0, self.height)
    }
}

/// Anchor of the plant, set by `initialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Horizontal position of the initial group.
    pub x: f32,
    /// Ground line shared by every stem base.
    pub y: f32,
}

impl Anchor {
    /// Anchor at `(x, y)` whose ground line stays within the screen height, if known.
    #[must_use]
    pub fn on_screen(x: f32, y: f32, screen: Option<Screen>) -> Self {
        let y = screen.map_or(y, |screen| screen.clamp_y(y));
        Self { x, y }
    }
}

/// Pure system that emits group planting and activation commands.
#[derive(Clone, Debug)]
pub struct Planting {
    stem: StemTuning,
    shoot: ShootTuning,
    spike_length_fraction: f32,
}

impl Planting {
    /// Creates the system from the species configuration.
    #[must_use]
    pub fn new(config: &SpeciesConfig) -> Self {
        Self {
            stem: config.stem.clone(),
            shoot: config.shoot.clone(),
            spike_length_fraction: config.flower.spike_length_fraction,
        }
    }

    /// Plants the initial group at the anchor without activating it.
    pub fn plant_initial(
        &self,
        anchor: Anchor,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        let stems = self.group_blueprints(anchor.x, anchor.y, ids, rng);
        out.push(Command::PlantGroup {
            group: GroupId::INITIAL,
            stems,
        });
    }

    /// Resolves an activation into the commands carrying it out.
    ///
    /// New groups land at a random offset from the anchor, kept inside the
    /// screen margins when the screen size is known.
    pub fn handle(
        &self,
        activation: Activation,
        anchor: Anchor,
        screen: Option<Screen>,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Command>,
    ) {
        if let Activation::Plant(group) = activation {
            let offset = rng.signed(self.stem.group_spread);
            let origin = match screen {
                Some(screen) => screen.clamp_x(anchor.x + offset, self.stem.screen_margin),
                None => anchor.x + offset,
            };
            let stems = self.group_blueprints(origin, anchor.y, ids, rng);
            out.push(Command::PlantGroup { group, stems });
        }

        out.push(Command::ActivateGroup {
            group: activation.group(),
        });
    }

    fn group_blueprints(
        &self,
        origin_x: f32,
        base_y: f32,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
    ) -> Vec<StemBlueprint> {
        let tuning = &self.stem;
        let count = rng.count(tuning.stems_per_group_min, tuning.stems_per_group_max);
        let centre = count.saturating_sub(1) as f32 * 0.5;

        (0..count)
            .map(|slot| {
                let offset = (slot as f32 - centre) * tuning.stem_spacing;
                let wobble = rng.signed(tuning.stem_spacing * 0.25);
                self.stem_blueprint(origin_x + offset + wobble, base_y, ids, rng)
            })
            .collect()
    }

    fn stem_blueprint(
        &self,
        base_x: f32,
        base_y: f32,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
    ) -> StemBlueprint {
        let tuning = &self.stem;
        let id = ids.next_stem();
        let max_height = rng.range(tuning.max_height_min, tuning.max_height_max);
        let growth_speed_multiplier =
            rng.range(tuning.speed_multiplier_min, tuning.speed_multiplier_max);
        let lean = rng.signed(tuning.lean_max);
        let first_segment_length = rng.range(tuning.segment_length_min, tuning.segment_length_max);

        let shoot_count = rng.count(self.shoot.shoots_per_stem_min, self.shoot.shoots_per_stem_max);
        let leans_left = rng.next_unit() < 0.5;
        let shoots = (0..shoot_count)
            .map(|slot| {
                let left = leans_left == (slot % 2 == 0);
                self.shoot_blueprint(left, ids, rng)
            })
            .collect();

        StemBlueprint {
            id,
            base_x,
            base_y,
            max_height,
            growth_speed_multiplier,
            lean,
            first_segment_length,
            base_thickness: tuning.base_thickness,
            tip_thickness: tuning.tip_thickness,
            spike_max_length: max_height * self.spike_length_fraction,
            shoots,
        }
    }

    fn shoot_blueprint(
        &self,
        left: bool,
        ids: &mut IdAllocator,
        rng: &mut dyn RandomSource,
    ) -> ShootBlueprint {
        let tuning = &self.shoot;
        let magnitude = rng.range(tuning.angle_min, tuning.angle_max);
        ShootBlueprint {
            id: ids.next_shoot(),
            angle: if left { -magnitude } else { magnitude },
            max_height: rng.range(tuning.max_height_min, tuning.max_height_max),
            growth_speed_multiplier: rng
                .range(tuning.speed_multiplier_min, tuning.speed_multiplier_max),
            first_segment_length: rng
                .range(self.stem.segment_length_min, self.stem.segment_length_max),
            base_thickness: tuning.base_thickness,
            tip_thickness: tuning.tip_thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_screens_centre_the_group() {
        let screen = Screen::new(60.0, 400.0);
        assert_eq!(screen.clamp_x(5.0, 40.0), 30.0);
    }

    #[test]
    fn unknown_widths_leave_positions_alone() {
        let screen = Screen::new(0.0, 0.0);
        assert_eq!(screen.clamp_x(-25.0, 40.0), -25.0);
    }

    #[test]
    fn ground_line_stays_within_the_screen_height() {
        let screen = Some(Screen::new(800.0, 600.0));
        assert_eq!(Anchor::on_screen(400.0, 900.0, screen).y, 600.0);
        assert_eq!(Anchor::on_screen(400.0, -20.0, screen).y, 0.0);
        assert_eq!(Anchor::on_screen(400.0, 550.0, screen).y, 550.0);
        assert_eq!(Anchor::on_screen(400.0, 900.0, None).y, 900.0);
        assert_eq!(
            Anchor::on_screen(400.0, 900.0, Some(Screen::new(800.0, 0.0))).y,
            900.0
        );
    }

    #[test]
    fn positions_are_clamped_to_margins() {
        let screen = Screen::new(800.0, 600.0);
        assert_eq!(screen.clamp_x(-100.0, 40.0), 40.0);
        assert_eq!(screen.clamp_x(900.0, 40.0), 760.0);
        assert_eq!(screen.clamp_x(400.0, 40.0), 400.0);
    }
}
