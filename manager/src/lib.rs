#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-species plant manager orchestrating the Breath Garden systems.
//!
//! A [`PlantManager`] owns the plant state together with every system and
//! collaborator. Callers feed it one breath force sample per frame through
//! [`PlantManager::process_stem_growth`], [`PlantManager::process_leaves_growth`]
//! and [`PlantManager::process_flower_growth`], in that order, and render from
//! [`PlantManager::snapshot`].

mod collaborators;

use std::fmt;

use breath_garden_core::{
    sanitize_force, Command, ConfigError, Event, GroupId, GrowthObserver, IdAllocator,
    SpeciesConfig,
};
use breath_garden_system_growth::GrowthAllocator;
use breath_garden_system_planting::{Anchor, Planting};
use breath_garden_system_saccade::Saccades;
use breath_garden_system_spawning::SubStructureSpawner;
use breath_garden_world::{self as world, query, PlantState};
use tracing::{debug, info, trace};

pub use breath_garden_system_planting::Screen;
pub use breath_garden_world::query::PlantSnapshot;
pub use collaborators::Collaborators;

/// Growth engine for one plant, parameterised by a species configuration.
pub struct PlantManager {
    config: SpeciesConfig,
    state: PlantState,
    saccades: Saccades,
    planting: Planting,
    growth: GrowthAllocator,
    spawner: SubStructureSpawner,
    ids: IdAllocator,
    collaborators: Collaborators,
    anchor: Option<Anchor>,
    screen: Option<Screen>,
    last_force: f32,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl PlantManager {
    /// Creates a manager with the default collaborators for the configuration.
    pub fn new(config: SpeciesConfig) -> Result<Self, ConfigError> {
        let collaborators = Collaborators::for_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    /// Creates a manager using explicitly injected collaborators.
    pub fn with_collaborators(
        config: SpeciesConfig,
        mut collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let saccades = Saccades::new(
            &config.breath,
            config.max_groups,
            collaborators.rng.as_mut(),
        );
        Ok(Self {
            planting: Planting::new(&config),
            growth: GrowthAllocator::new(&config),
            spawner: SubStructureSpawner::new(&config),
            state: PlantState::new(),
            saccades,
            ids: IdAllocator::new(),
            collaborators,
            anchor: None,
            screen: None,
            last_force: 0.0,
            commands: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    /// Anchors the plant and plants the initial group.
    ///
    /// Does nothing when stems already exist. With a known screen size the
    /// ground line is kept within the screen height.
    pub fn initialize(&mut self, base_x: f32, base_y: f32) {
        if !query::stems(&self.state).is_empty() {
            debug!(species = %self.config.name, "initialize ignored; plant already has stems");
            return;
        }

        let anchor = Anchor::on_screen(base_x, base_y, self.screen);
        self.anchor = Some(anchor);
        self.planting.plant_initial(
            anchor,
            &mut self.ids,
            self.collaborators.rng.as_mut(),
            &mut self.commands,
        );
        self.flush();

        info!(
            species = %self.config.name,
            base_x,
            base_y,
            stems = query::stems(&self.state).len(),
            "plant initialized",
        );
    }

    /// Advances saccade detection, group activation and primary growth by one tick.
    ///
    /// Samples fed before [`PlantManager::initialize`] only advance the clock.
    pub fn process_stem_growth(&mut self, force: f32) {
        let force = sanitize_force(force);
        let now = self.collaborators.clock.now();
        let Some(anchor) = self.anchor else {
            return;
        };

        let before = self.saccades.saccade_count();
        let activation = self.saccades.observe(force, now);
        if self.saccades.saccade_count() != before {
            debug!(
                species = %self.config.name,
                saccade = self.saccades.saccade_count(),
                at_ms = now.as_millis() as u64,
                activation = ?activation,
                "breath saccade detected",
            );
        }
        if let Some(activation) = activation {
            self.planting.handle(
                activation,
                anchor,
                self.screen,
                &mut self.ids,
                self.collaborators.rng.as_mut(),
                &mut self.commands,
            );
            self.flush();
        }

        self.growth.handle(
            &self.state,
            force,
            self.last_force,
            self.collaborators.rng.as_mut(),
            &mut self.commands,
        );
        self.flush();
        self.last_force = force;
    }

    /// Spawns leaves whose thresholds were crossed and grows existing leaves.
    pub fn process_leaves_growth(&mut self, force: f32) {
        self.spawner.handle_leaves(
            &self.state,
            force,
            self.collaborators.rng.as_mut(),
            &mut self.commands,
        );
        self.flush();
    }

    /// Starts blooming where thresholds were crossed and grows existing flowers.
    pub fn process_flower_growth(&mut self, force: f32) {
        self.spawner.handle_flowers(
            &self.state,
            force,
            &mut self.ids,
            self.collaborators.rng.as_mut(),
            &mut self.commands,
        );
        self.flush();
    }

    /// Clears the plant and reshuffles the activation order.
    ///
    /// The screen size and identifier counters survive the reset.
    pub fn reset(&mut self) {
        self.state = PlantState::new();
        self.saccades.reset(self.collaborators.rng.as_mut());
        self.anchor = None;
        self.last_force = 0.0;
        self.commands.clear();
        self.events.clear();
        info!(species = %self.config.name, "plant reset");
    }

    /// Read-only view of every stem, leaf and flower.
    #[must_use]
    pub fn snapshot(&self) -> PlantSnapshot<'_> {
        query::snapshot(&self.state)
    }

    /// Records the canvas dimensions used to keep the plant on screen.
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen = Some(Screen::new(width, height));
    }

    /// Canvas dimensions, if known.
    #[must_use]
    pub const fn screen(&self) -> Option<Screen> {
        self.screen
    }

    /// Species configuration the manager was built with.
    #[must_use]
    pub const fn config(&self) -> &SpeciesConfig {
        &self.config
    }

    /// Authoritative plant state, for queries.
    #[must_use]
    pub const fn state(&self) -> &PlantState {
        &self.state
    }

    /// Reports whether `initialize` planted the initial group since the last reset.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.anchor.is_some()
    }

    /// Saccades detected since the last reset.
    #[must_use]
    pub const fn saccade_count(&self) -> usize {
        self.saccades.saccade_count()
    }

    /// Group currently receiving primary growth.
    #[must_use]
    pub fn active_group(&self) -> Option<GroupId> {
        query::active_group(&self.state)
    }

    /// Number of groups planted since the last reset.
    #[must_use]
    pub fn group_count(&self) -> usize {
        query::planted_groups(&self.state).len()
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.state, command, &mut self.events);
        }
        for event in self.events.drain(..) {
            dispatch(self.collaborators.observer.as_mut(), &event);
        }
    }
}

impl fmt::Debug for PlantManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantManager")
            .field("species", &self.config.name)
            .field("stems", &query::stems(&self.state).len())
            .field("leaves", &query::leaves(&self.state).len())
            .field("active_group", &self.active_group())
            .field("saccades", &self.saccade_count())
            .finish_non_exhaustive()
    }
}

fn dispatch(observer: &mut dyn GrowthObserver, event: &Event) {
    match *event {
        Event::StemCreated { id, x, y, .. } => {
            trace!(%id, x, y, "stem created");
            observer.on_stem_created(x, y, id);
        }
        Event::FlowerBecameVisible { id, x, y } => {
            trace!(%id, x, y, "flower visible");
            observer.on_flower_created(x, y, id);
        }
        Event::GroupPlanted { group, stems } => {
            debug!(group = group.get(), stems, "group planted");
        }
        Event::GroupActivated { group } => {
            debug!(group = group.get(), "group activated");
        }
        Event::BloomingStarted {
            stem_index,
            flowers,
        } => {
            debug!(stem_index, flowers, "spike started blooming");
        }
        Event::LeavesSpawned { role, count, .. } => {
            trace!(?role, count, "leaves spawned");
        }
        Event::StemGrew { stem_index, height } => {
            trace!(stem_index, height, "stem grew");
        }
    }
}
