#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that grows a Breath Garden plant from a synthetic breath.

mod summary;
mod waveform;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use breath_garden_core::{FlowerId, GrowthObserver, Species, SpeciesConfig, StemId};
use breath_garden_manager::{Collaborators, PlantManager};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::{summary::RunSummary, waveform::BreathWaveform};

#[derive(Parser, Debug)]
#[command(
    name = "breath-garden",
    version,
    about = "Grow a plant headlessly from a synthetic breath signal"
)]
struct Cli {
    /// Species preset to grow.
    #[arg(long, value_enum, default_value_t = SpeciesArg::Lupin)]
    species: SpeciesArg,
    /// TOML file describing a custom species; replaces the preset.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seed for the growth engine and the breath waveform.
    #[arg(long)]
    seed: Option<u64>,
    /// Amplitude of the noise added to the breath waveform.
    #[arg(long, default_value_t = 0.04, value_parser = parse_noise)]
    noise: f32,
    /// Canvas width used to keep groups on screen.
    #[arg(long, default_value_t = 1024.0)]
    width: f32,
    /// Canvas height; the plant is anchored near its bottom edge.
    #[arg(long, default_value_t = 768.0)]
    height: f32,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpeciesArg {
    Lupin,
    Rose,
    Orchid,
    GenericFlower,
}

impl From<SpeciesArg> for Species {
    fn from(value: SpeciesArg) -> Self {
        match value {
            SpeciesArg::Lupin => Species::Lupin,
            SpeciesArg::Rose => Species::Rose,
            SpeciesArg::Orchid => Species::Orchid,
            SpeciesArg::GenericFlower => Species::GenericFlower,
        }
    }
}

/// Observer reporting notable structures through the log.
#[derive(Debug, Default)]
struct LoggingObserver;

impl GrowthObserver for LoggingObserver {
    fn on_stem_created(&mut self, x: f32, y: f32, id: StemId) {
        info!(%id, x, y, "stem sprouted");
    }

    fn on_flower_created(&mut self, x: f32, y: f32, id: FlowerId) {
        info!(%id, x, y, "flower opened");
    }
}

/// Entry point for the Breath Garden command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = load_config(&cli)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let collaborators = Collaborators::for_config(&config).with_observer(LoggingObserver);
    let mut manager = PlantManager::with_collaborators(config, collaborators)
        .context("species configuration is invalid")?;
    manager.set_screen_size(cli.width, cli.height);
    manager.initialize(cli.width * 0.5, cli.height * 0.95);

    let mut breath = BreathWaveform::new(seed, cli.noise);
    for _ in 0..cli.ticks {
        let force = breath.next_sample();
        manager.process_stem_growth(force);
        manager.process_leaves_growth(force);
        manager.process_flower_growth(force);
    }

    let summary = RunSummary::collect(&manager, cli.ticks);
    if cli.json {
        let json =
            serde_json::to_string_pretty(&summary).context("failed to serialise run summary")?;
        println!("{json}");
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_noise(value: &str) -> Result<f32, String> {
    let noise: f32 = value
        .parse()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;
    if noise.is_finite() && noise >= 0.0 {
        Ok(noise)
    } else {
        Err(format!("noise must be a finite, non-negative amplitude, got {value}"))
    }
}

fn load_config(cli: &Cli) -> Result<SpeciesConfig> {
    match &cli.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SpeciesConfig::from_toml_str(&source)
                .with_context(|| format!("failed to load species from {}", path.display()))
        }
        None => Ok(Species::from(cli.species).config()),
    }
}
