use std::fmt;

use breath_garden_core::{Pattern, RarityTier, SizeCategory};
use breath_garden_manager::PlantManager;
use serde::Serialize;

/// Outcome of a headless run.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) species: String,
    pub(crate) ticks: u32,
    pub(crate) saccades: usize,
    pub(crate) groups: usize,
    pub(crate) stems: usize,
    pub(crate) shoots: usize,
    pub(crate) leaves: usize,
    pub(crate) flowers: usize,
    pub(crate) visible_flowers: usize,
    pub(crate) tallest_stem: f32,
    pub(crate) rarest_flower: Option<RarestFlower>,
}

/// Genetics of the rarest flower grown during the run.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RarestFlower {
    pub(crate) id: String,
    pub(crate) palette: String,
    pub(crate) pattern: Pattern,
    pub(crate) size: SizeCategory,
    pub(crate) rarity: f32,
    pub(crate) tier: RarityTier,
}

impl RunSummary {
    /// Collects the summary from the manager's current snapshot.
    pub(crate) fn collect(manager: &PlantManager, ticks: u32) -> Self {
        let snapshot = manager.snapshot();
        let stems = snapshot.stems();

        let rarest_flower = snapshot
            .flowers()
            .filter_map(|flower| flower.genetics().map(|genetics| (flower.id(), genetics)))
            .max_by(|(_, left), (_, right)| left.rarity.total_cmp(&right.rarity))
            .map(|(id, genetics)| RarestFlower {
                id: id.to_string(),
                palette: genetics.palette.clone(),
                pattern: genetics.pattern,
                size: genetics.size,
                rarity: genetics.rarity,
                tier: genetics.tier(),
            });

        Self {
            species: manager.config().name.clone(),
            ticks,
            saccades: manager.saccade_count(),
            groups: manager.group_count(),
            stems: stems.len(),
            shoots: stems.iter().map(|stem| stem.shoots().len()).sum(),
            leaves: snapshot.leaves().len(),
            flowers: snapshot.flowers().count(),
            visible_flowers: snapshot.flowers().filter(|flower| flower.is_visible()).count(),
            tallest_stem: stems
                .iter()
                .map(|stem| stem.current_height())
                .fold(0.0, f32::max),
            rarest_flower,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "species:          {}", self.species)?;
        writeln!(f, "ticks:            {}", self.ticks)?;
        writeln!(f, "saccades:         {}", self.saccades)?;
        writeln!(f, "groups:           {}", self.groups)?;
        writeln!(
            f,
            "stems:            {} ({} basal shoots)",
            self.stems, self.shoots
        )?;
        writeln!(f, "tallest stem:     {:.1}", self.tallest_stem)?;
        writeln!(f, "leaves:           {}", self.leaves)?;
        writeln!(
            f,
            "flowers:          {} ({} open)",
            self.flowers, self.visible_flowers
        )?;
        match &self.rarest_flower {
            Some(rarest) => write!(
                f,
                "rarest flower:    {} {:?} {:?} {:?} from {} (rarity {:.2})",
                rarest.id, rarest.tier, rarest.pattern, rarest.size, rarest.palette, rarest.rarity
            ),
            None => write!(f, "rarest flower:    none"),
        }
    }
}
