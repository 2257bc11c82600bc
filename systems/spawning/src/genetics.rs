use breath_garden_core::{
    weighted_index, FlowerColor, Genetics, PaletteEntry, Pattern, RandomSource, SizeCategory,
};

const FALLBACK_COLOR: FlowerColor = FlowerColor::from_rgb(0xff, 0xff, 0xff);

/// Colour drawn from the species palettes together with its palette's odds.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteDraw {
    /// Name of the chosen palette; empty when no palette offers a colour.
    pub palette: String,
    /// Colour picked uniformly inside the palette.
    pub color: FlowerColor,
    /// Selection probability of the palette.
    pub probability: f32,
}

/// Draws a colour, weighting palettes by their configured weight.
///
/// Palettes without colours are never chosen.
pub fn draw_color(rng: &mut dyn RandomSource, palettes: &[PaletteEntry]) -> PaletteDraw {
    let weights: Vec<f32> = palettes
        .iter()
        .map(|palette| {
            if palette.colors.is_empty() {
                0.0
            } else {
                palette.weight.max(0.0)
            }
        })
        .collect();
    let total: f32 = weights.iter().sum();
    if !(total > 0.0) {
        return PaletteDraw {
            palette: String::new(),
            color: FALLBACK_COLOR,
            probability: 1.0,
        };
    }

    let index = weighted_index(rng, &weights);
    let palette = &palettes[index];
    let color = palette.colors[rng.index(palette.colors.len())];
    PaletteDraw {
        palette: palette.name.clone(),
        color,
        probability: weights[index] / total,
    }
}

/// Samples an immutable genetics bundle for a freshly spawned flower.
///
/// The rarity is the mean of `1 - p` over the palette, pattern and size
/// draws, where `p` is the probability of the drawn value.
pub fn sample_genetics(rng: &mut dyn RandomSource, palettes: &[PaletteEntry]) -> Genetics {
    let draw = draw_color(rng, palettes);
    let (pattern, pattern_probability) = pick(rng, &Pattern::TABLE);
    let (size, size_probability) = pick(rng, &SizeCategory::TABLE);
    let shape_variation = rng.signed(1.0);
    let seed = rng.next_seed();

    let rarity = ((1.0 - draw.probability) + (1.0 - pattern_probability) + (1.0 - size_probability))
        / 3.0;

    Genetics {
        palette: draw.palette,
        color: draw.color,
        shape_variation,
        pattern,
        size,
        rarity: rarity.clamp(0.0, 1.0),
        seed,
    }
}

fn pick<T: Copy>(rng: &mut dyn RandomSource, table: &[(T, f32)]) -> (T, f32) {
    let weights: Vec<f32> = table.iter().map(|(_, probability)| *probability).collect();
    table[weighted_index(rng, &weights)]
}
