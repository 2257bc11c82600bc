use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FlowerColor;

/// Errors reported when a species configuration is malformed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The breath hysteresis band is empty or inverted.
    #[error("breath end threshold {end} must lie strictly below start threshold {start}")]
    InvertedHysteresis {
        /// Configured start threshold.
        start: f32,
        /// Configured end threshold.
        end: f32,
    },
    /// A value that must be positive was zero, negative or not finite.
    #[error("{field} must be a finite positive value, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A value that must be a fraction fell outside `[0, 1]`.
    #[error("{field} must lie within [0, 1], got {value}")]
    NotAFraction {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A `[min, max]` pair was inverted or had a non-finite bound.
    #[error("{field} range is invalid: minimum {min}, maximum {max}")]
    EmptyRange {
        /// Name of the offending range.
        field: &'static str,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },
    /// The activation pool would contain no groups.
    #[error("max_groups must be at least one")]
    NoGroups,
    /// No palette offers a colour to draw flowers from.
    #[error("flower palettes must offer at least one colour with a positive weight")]
    EmptyPalette,
    /// The TOML source could not be decoded.
    #[error("failed to parse species configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Thresholds governing saccade detection and force gating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathTuning {
    /// Force below which nothing grows.
    pub force_threshold: f32,
    /// Force that must be crossed upward to start a breath.
    pub breath_start_threshold: f32,
    /// Force below which a breath ends; strictly lower than the start threshold.
    pub breath_end_threshold: f32,
    /// Minimum time between two saccades, in milliseconds.
    pub saccade_cooldown_ms: u64,
    /// Logical duration of one tick, in milliseconds.
    pub tick_ms: u64,
}

impl BreathTuning {
    /// Cooldown between saccades as a duration.
    #[must_use]
    pub const fn saccade_cooldown(&self) -> Duration {
        Duration::from_millis(self.saccade_cooldown_ms)
    }

    /// Logical tick length as a duration.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for BreathTuning {
    fn default() -> Self {
        Self {
            force_threshold: 0.15,
            breath_start_threshold: 0.3,
            breath_end_threshold: 0.2,
            saccade_cooldown_ms: 300,
            tick_ms: 16,
        }
    }
}

/// Parameters shaping primary stems and their placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemTuning {
    /// Fewest stems planted per group.
    pub stems_per_group_min: u32,
    /// Most stems planted per group.
    pub stems_per_group_max: u32,
    /// Lower bound of the per-stem maximum height.
    pub max_height_min: f32,
    /// Upper bound of the per-stem maximum height.
    pub max_height_max: f32,
    /// Stems at least this tall carry the larger leaf batch.
    pub tall_stem_height: f32,
    /// Base growth rate in height units per unit force per scaled tick.
    pub growth_rate: f32,
    /// Scale converting one tick into growth-rate time.
    pub tick_scale: f32,
    /// Lower bound of the per-stem growth speed multiplier.
    pub speed_multiplier_min: f32,
    /// Upper bound of the per-stem growth speed multiplier.
    pub speed_multiplier_max: f32,
    /// Shortest polyline segment.
    pub segment_length_min: f32,
    /// Longest polyline segment.
    pub segment_length_max: f32,
    /// Horizontal noise applied to each new point.
    pub jitter: f32,
    /// Largest horizontal drift per unit height.
    pub lean_max: f32,
    /// Thickness at the stem base.
    pub base_thickness: f32,
    /// Thickness at the tip of a fully grown stem.
    pub tip_thickness: f32,
    /// Horizontal spacing between stems of one group.
    pub stem_spacing: f32,
    /// Largest horizontal offset of a new group from the anchor.
    pub group_spread: f32,
    /// Distance kept from the screen edges when placing groups.
    pub screen_margin: f32,
}

impl Default for StemTuning {
    fn default() -> Self {
        Self {
            stems_per_group_min: 1,
            stems_per_group_max: 3,
            max_height_min: 160.0,
            max_height_max: 260.0,
            tall_stem_height: 220.0,
            growth_rate: 150.0,
            tick_scale: 0.008,
            speed_multiplier_min: 0.85,
            speed_multiplier_max: 1.15,
            segment_length_min: 7.0,
            segment_length_max: 9.0,
            jitter: 1.2,
            lean_max: 0.06,
            base_thickness: 5.0,
            tip_thickness: 1.5,
            stem_spacing: 26.0,
            group_spread: 240.0,
            screen_margin: 40.0,
        }
    }
}

/// Parameters shaping basal shoots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootTuning {
    /// Fewest shoots per stem.
    pub shoots_per_stem_min: u32,
    /// Most shoots per stem.
    pub shoots_per_stem_max: u32,
    /// Lower bound of the per-shoot maximum length.
    pub max_height_min: f32,
    /// Upper bound of the per-shoot maximum length.
    pub max_height_max: f32,
    /// Base growth rate, analogous to the stem growth rate.
    pub growth_rate: f32,
    /// Lower bound of the per-shoot growth speed multiplier.
    pub speed_multiplier_min: f32,
    /// Upper bound of the per-shoot growth speed multiplier.
    pub speed_multiplier_max: f32,
    /// Smallest lean away from vertical, in radians.
    pub angle_min: f32,
    /// Largest lean away from vertical, in radians.
    pub angle_max: f32,
    /// Thickness at the shoot base.
    pub base_thickness: f32,
    /// Thickness at the tip of a fully grown shoot.
    pub tip_thickness: f32,
}

impl Default for ShootTuning {
    fn default() -> Self {
        Self {
            shoots_per_stem_min: 1,
            shoots_per_stem_max: 2,
            max_height_min: 30.0,
            max_height_max: 70.0,
            growth_rate: 90.0,
            speed_multiplier_min: 0.8,
            speed_multiplier_max: 1.2,
            angle_min: 0.3,
            angle_max: 0.8,
            base_thickness: 2.5,
            tip_thickness: 0.8,
        }
    }
}

/// Parameters governing leaf spawning and growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafTuning {
    /// Stem height a stem must exceed before it receives leaves.
    pub stem_leaf_min_height: f32,
    /// Leaves spawned on an ordinary stem.
    pub leaves_per_stem: u32,
    /// Leaves spawned on a tall stem.
    pub leaves_per_tall_stem: u32,
    /// Leaves clustered beneath a blooming spike.
    pub sub_floral_leaves: u32,
    /// Shoot length a shoot must exceed before it receives leaves.
    pub shoot_leaf_min_height: f32,
    /// Fewest leaves per shoot.
    pub shoot_leaves_min: u32,
    /// Most leaves per shoot.
    pub shoot_leaves_max: u32,
    /// Lower bound of the leaf maximum size.
    pub max_size_min: f32,
    /// Upper bound of the leaf maximum size.
    pub max_size_max: f32,
    /// Size factor applied to leaves carried by shoots.
    pub shoot_size_multiplier: f32,
    /// Fraction of the maximum size gained per tick per unit force.
    pub growth_rate: f32,
}

impl Default for LeafTuning {
    fn default() -> Self {
        Self {
            stem_leaf_min_height: 35.0,
            leaves_per_stem: 3,
            leaves_per_tall_stem: 5,
            sub_floral_leaves: 2,
            shoot_leaf_min_height: 15.0,
            shoot_leaves_min: 1,
            shoot_leaves_max: 3,
            max_size_min: 12.0,
            max_size_max: 20.0,
            shoot_size_multiplier: 1.4,
            growth_rate: 0.02,
        }
    }
}

/// Named set of colours flowers may draw from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Display name recorded in flower genetics.
    pub name: String,
    /// Relative selection weight.
    pub weight: f32,
    /// Colours offered by the palette.
    pub colors: Vec<FlowerColor>,
}

impl PaletteEntry {
    fn new(name: &str, weight: f32, colors: &[(u8, u8, u8)]) -> Self {
        Self {
            name: name.to_owned(),
            weight,
            colors: colors
                .iter()
                .map(|&(red, green, blue)| FlowerColor::from_rgb(red, green, blue))
                .collect(),
        }
    }
}

/// Parameters governing flower spikes and flowers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerTuning {
    /// Fraction of the stem's maximum height that triggers blooming.
    pub bloom_height_fraction: f32,
    /// Flowers attached to every spike.
    pub flowers_per_spike: u32,
    /// Spike length as a fraction of the stem's maximum height.
    pub spike_length_fraction: f32,
    /// Horizontal spread of flowers around the spike axis.
    pub spike_spread: f32,
    /// Lower bound of the flower maximum size.
    pub max_size_min: f32,
    /// Upper bound of the flower maximum size.
    pub max_size_max: f32,
    /// Fraction of the maximum size gained per tick per unit force.
    pub growth_rate: f32,
    /// Fraction of the maximum size at which a flower is announced.
    pub visibility_fraction: f32,
    /// Whether flowers carry genetics bundles.
    pub genetics: bool,
    /// Palettes flowers draw their colour from.
    pub palettes: Vec<PaletteEntry>,
}

impl Default for FlowerTuning {
    fn default() -> Self {
        Self {
            bloom_height_fraction: 0.4,
            flowers_per_spike: 8,
            spike_length_fraction: 0.3,
            spike_spread: 6.0,
            max_size_min: 6.0,
            max_size_max: 10.0,
            growth_rate: 0.015,
            visibility_fraction: 0.1,
            genetics: false,
            palettes: vec![PaletteEntry::new(
                "meadow",
                1.0,
                &[(0xf4, 0xd0, 0x3f), (0xf7, 0xf7, 0xf2), (0xe0, 0x6c, 0x9f)],
            )],
        }
    }
}

/// Species presets bundled with the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Species {
    /// Tall spikes densely packed with small flowers.
    Lupin,
    /// Short stems with a few large blooms.
    Rose,
    /// Arching stems with sparse, mid-sized blooms.
    Orchid,
    /// Plain flowers without genetics.
    GenericFlower,
}

impl Species {
    /// Every bundled species.
    pub const ALL: [Species; 4] = [
        Species::Lupin,
        Species::Rose,
        Species::Orchid,
        Species::GenericFlower,
    ];

    /// Preset configuration of the species.
    #[must_use]
    pub fn config(self) -> SpeciesConfig {
        match self {
            Self::Lupin => SpeciesConfig::lupin(),
            Self::Rose => SpeciesConfig::rose(),
            Self::Orchid => SpeciesConfig::orchid(),
            Self::GenericFlower => SpeciesConfig::generic_flower(),
        }
    }
}

/// Complete per-species constant table supplied to a plant manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Species name, used in logs.
    pub name: String,
    /// Seed of the default random source.
    pub seed: u64,
    /// Size of the activation order pool.
    pub max_groups: usize,
    /// Saccade detection thresholds.
    pub breath: BreathTuning,
    /// Primary stem parameters.
    pub stem: StemTuning,
    /// Basal shoot parameters.
    pub shoot: ShootTuning,
    /// Leaf parameters.
    pub leaf: LeafTuning,
    /// Flower parameters.
    pub flower: FlowerTuning,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self::generic_flower()
    }
}

impl SpeciesConfig {
    /// Plain flowers without genetics.
    #[must_use]
    pub fn generic_flower() -> Self {
        Self {
            name: "flower".to_owned(),
            seed: 0x5eed_f10e,
            max_groups: 7,
            breath: BreathTuning::default(),
            stem: StemTuning::default(),
            shoot: ShootTuning::default(),
            leaf: LeafTuning::default(),
            flower: FlowerTuning::default(),
        }
    }

    /// Lupin preset: tall, dense flower spikes.
    #[must_use]
    pub fn lupin() -> Self {
        let mut config = Self::generic_flower();
        config.name = "lupin".to_owned();
        config.seed = 0x1b_c0de;
        config.stem.stems_per_group_min = 2;
        config.stem.stems_per_group_max = 4;
        config.stem.max_height_min = 200.0;
        config.stem.max_height_max = 300.0;
        config.stem.tall_stem_height = 260.0;
        config.stem.stem_spacing = 22.0;
        config.flower.flowers_per_spike = 16;
        config.flower.spike_length_fraction = 0.45;
        config.flower.spike_spread = 5.0;
        config.flower.max_size_min = 5.0;
        config.flower.max_size_max = 8.0;
        config.flower.genetics = true;
        config.flower.palettes = vec![
            PaletteEntry::new(
                "sky",
                5.0,
                &[(0x5b, 0x6e, 0xe1), (0x7a, 0x5c, 0xd6), (0x9d, 0xb4, 0xff)],
            ),
            PaletteEntry::new("blush", 3.0, &[(0xf2, 0x9c, 0xc2), (0xe5, 0x6b, 0xa8)]),
            PaletteEntry::new("sunset", 1.0, &[(0xf5, 0xa6, 0x23), (0xe8, 0x5d, 0x2f)]),
        ];
        config
    }

    /// Rose preset: short stems with a few large blooms.
    #[must_use]
    pub fn rose() -> Self {
        let mut config = Self::generic_flower();
        config.name = "rose".to_owned();
        config.seed = 0x7053;
        config.stem.stems_per_group_min = 1;
        config.stem.stems_per_group_max = 2;
        config.stem.max_height_min = 120.0;
        config.stem.max_height_max = 180.0;
        config.stem.tall_stem_height = 165.0;
        config.stem.base_thickness = 6.0;
        config.stem.tip_thickness = 2.5;
        config.leaf.leaves_per_stem = 4;
        config.leaf.leaves_per_tall_stem = 6;
        config.flower.flowers_per_spike = 3;
        config.flower.spike_length_fraction = 0.12;
        config.flower.spike_spread = 10.0;
        config.flower.max_size_min = 14.0;
        config.flower.max_size_max = 20.0;
        config.flower.genetics = true;
        config.flower.palettes = vec![
            PaletteEntry::new("crimson", 6.0, &[(0xb0, 0x1e, 0x2f), (0xd7, 0x26, 0x3d)]),
            PaletteEntry::new("ivory", 3.0, &[(0xf8, 0xf1, 0xe0), (0xf3, 0xe3, 0xc3)]),
            PaletteEntry::new("coral", 1.0, &[(0xff, 0x7f, 0x6b)]),
        ];
        config
    }

    /// Orchid preset: arching stems with sparse blooms.
    #[must_use]
    pub fn orchid() -> Self {
        let mut config = Self::generic_flower();
        config.name = "orchid".to_owned();
        config.seed = 0x0c41d;
        config.stem.stems_per_group_min = 1;
        config.stem.stems_per_group_max = 2;
        config.stem.max_height_min = 90.0;
        config.stem.max_height_max = 150.0;
        config.stem.tall_stem_height = 135.0;
        config.stem.lean_max = 0.14;
        config.shoot.shoots_per_stem_min = 0;
        config.shoot.shoots_per_stem_max = 1;
        config.flower.flowers_per_spike = 6;
        config.flower.spike_length_fraction = 0.3;
        config.flower.spike_spread = 12.0;
        config.flower.max_size_min = 10.0;
        config.flower.max_size_max = 14.0;
        config.flower.genetics = true;
        config.flower.palettes = vec![
            PaletteEntry::new("moth", 4.0, &[(0xfa, 0xf7, 0xff), (0xf0, 0xd9, 0xf5)]),
            PaletteEntry::new("lilac", 2.0, &[(0xc8, 0xa2, 0xd6), (0xa6, 0x7b, 0xc9)]),
        ];
        config
    }

    /// Parses a configuration from TOML; omitted fields keep the generic defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SpeciesConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_groups == 0 {
            return Err(ConfigError::NoGroups);
        }

        let breath = &self.breath;
        non_negative("breath.force_threshold", breath.force_threshold)?;
        positive("breath.breath_start_threshold", breath.breath_start_threshold)?;
        non_negative("breath.breath_end_threshold", breath.breath_end_threshold)?;
        if !(breath.breath_end_threshold < breath.breath_start_threshold) {
            return Err(ConfigError::InvertedHysteresis {
                start: breath.breath_start_threshold,
                end: breath.breath_end_threshold,
            });
        }

        let stem = &self.stem;
        ordered(
            "stem.stems_per_group",
            stem.stems_per_group_min as f32,
            stem.stems_per_group_max as f32,
        )?;
        positive("stem.max_height_min", stem.max_height_min)?;
        ordered("stem.max_height", stem.max_height_min, stem.max_height_max)?;
        positive("stem.growth_rate", stem.growth_rate)?;
        positive("stem.tick_scale", stem.tick_scale)?;
        positive("stem.speed_multiplier_min", stem.speed_multiplier_min)?;
        ordered(
            "stem.speed_multiplier",
            stem.speed_multiplier_min,
            stem.speed_multiplier_max,
        )?;
        positive("stem.segment_length_min", stem.segment_length_min)?;
        ordered(
            "stem.segment_length",
            stem.segment_length_min,
            stem.segment_length_max,
        )?;
        positive("stem.base_thickness", stem.base_thickness)?;
        positive("stem.tip_thickness", stem.tip_thickness)?;
        non_negative("stem.tall_stem_height", stem.tall_stem_height)?;
        non_negative("stem.jitter", stem.jitter)?;
        non_negative("stem.lean_max", stem.lean_max)?;
        non_negative("stem.stem_spacing", stem.stem_spacing)?;
        non_negative("stem.group_spread", stem.group_spread)?;
        non_negative("stem.screen_margin", stem.screen_margin)?;

        let shoot = &self.shoot;
        ordered(
            "shoot.shoots_per_stem",
            shoot.shoots_per_stem_min as f32,
            shoot.shoots_per_stem_max as f32,
        )?;
        positive("shoot.max_height_min", shoot.max_height_min)?;
        ordered("shoot.max_height", shoot.max_height_min, shoot.max_height_max)?;
        positive("shoot.growth_rate", shoot.growth_rate)?;
        positive("shoot.speed_multiplier_min", shoot.speed_multiplier_min)?;
        ordered(
            "shoot.speed_multiplier",
            shoot.speed_multiplier_min,
            shoot.speed_multiplier_max,
        )?;
        ordered("shoot.angle", shoot.angle_min, shoot.angle_max)?;
        positive("shoot.base_thickness", shoot.base_thickness)?;
        positive("shoot.tip_thickness", shoot.tip_thickness)?;

        let leaf = &self.leaf;
        non_negative("leaf.stem_leaf_min_height", leaf.stem_leaf_min_height)?;
        non_negative("leaf.shoot_leaf_min_height", leaf.shoot_leaf_min_height)?;
        ordered(
            "leaf.shoot_leaves",
            leaf.shoot_leaves_min as f32,
            leaf.shoot_leaves_max as f32,
        )?;
        positive("leaf.max_size_min", leaf.max_size_min)?;
        ordered("leaf.max_size", leaf.max_size_min, leaf.max_size_max)?;
        positive("leaf.shoot_size_multiplier", leaf.shoot_size_multiplier)?;
        non_negative("leaf.growth_rate", leaf.growth_rate)?;

        let flower = &self.flower;
        fraction("flower.bloom_height_fraction", flower.bloom_height_fraction)?;
        fraction("flower.spike_length_fraction", flower.spike_length_fraction)?;
        fraction("flower.visibility_fraction", flower.visibility_fraction)?;
        positive("flower.max_size_min", flower.max_size_min)?;
        ordered("flower.max_size", flower.max_size_min, flower.max_size_max)?;
        non_negative("flower.growth_rate", flower.growth_rate)?;
        non_negative("flower.spike_spread", flower.spike_spread)?;
        for palette in &flower.palettes {
            non_negative("flower.palettes.weight", palette.weight)?;
        }
        let offers_colour = flower
            .palettes
            .iter()
            .any(|palette| palette.weight > 0.0 && !palette.colors.is_empty());
        if !offers_colour {
            return Err(ConfigError::EmptyPalette);
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAFraction { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { field, min, max })
    }
}
