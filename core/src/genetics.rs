use serde::Serialize;

use crate::FlowerColor;

/// Petal marking pattern carried by a flower's genetics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Pattern {
    /// Uniform petal colour.
    Solid,
    /// Small contrasting dots.
    Speckled,
    /// Radial stripes.
    Striped,
    /// Two-tone petals.
    Bicolor,
    /// Contrasting petal rims.
    Picotee,
}

impl Pattern {
    /// Every pattern paired with its selection probability.
    pub const TABLE: [(Pattern, f32); 5] = [
        (Pattern::Solid, 0.45),
        (Pattern::Speckled, 0.20),
        (Pattern::Striped, 0.15),
        (Pattern::Bicolor, 0.12),
        (Pattern::Picotee, 0.08),
    ];
}

/// Size class of a flower, scaling its maximum size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SizeCategory {
    /// Smaller than usual blooms.
    Petite,
    /// Typical blooms.
    Standard,
    /// Oversized blooms.
    Grand,
}

impl SizeCategory {
    /// Every size class paired with its selection probability.
    pub const TABLE: [(SizeCategory, f32); 3] = [
        (SizeCategory::Standard, 0.60),
        (SizeCategory::Petite, 0.25),
        (SizeCategory::Grand, 0.15),
    ];

    /// Multiplier applied to the species' flower size.
    #[must_use]
    pub const fn size_factor(self) -> f32 {
        match self {
            Self::Petite => 0.75,
            Self::Standard => 1.0,
            Self::Grand => 1.35,
        }
    }
}

/// Coarse rarity bucket derived from a rarity score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RarityTier {
    /// Rarity below 0.55.
    Common,
    /// Rarity in `[0.55, 0.70)`.
    Uncommon,
    /// Rarity in `[0.70, 0.82)`.
    Rare,
    /// Rarity of 0.82 and above.
    Legendary,
}

impl RarityTier {
    /// Buckets a rarity score.
    #[must_use]
    pub fn from_score(rarity: f32) -> Self {
        if rarity >= 0.82 {
            Self::Legendary
        } else if rarity >= 0.70 {
            Self::Rare
        } else if rarity >= 0.55 {
            Self::Uncommon
        } else {
            Self::Common
        }
    }
}

/// Immutable bundle of visual and rarity attributes fixed when a flower spawns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Genetics {
    /// Name of the palette the colour was drawn from.
    pub palette: String,
    /// Colour expressed by the flower.
    pub color: FlowerColor,
    /// Petal shape deviation in `[-1, 1]`.
    pub shape_variation: f32,
    /// Petal marking pattern.
    pub pattern: Pattern,
    /// Size class of the flower.
    pub size: SizeCategory,
    /// Combined rarity in `[0, 1]`.
    pub rarity: f32,
    /// Seed reserved for the rendering collaborator's cosmetic variation.
    pub seed: u64,
}

impl Genetics {
    /// Rarity bucket of the bundle.
    #[must_use]
    pub fn tier(&self) -> RarityTier {
        RarityTier::from_score(self.rarity)
    }
}
