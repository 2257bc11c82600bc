use breath_garden_core::{
    seeded, Clock, FixedStepClock, GrowthObserver, NoopObserver, RandomSource, SpeciesConfig,
};

/// Capabilities injected into a plant manager at construction.
pub struct Collaborators {
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) observer: Box<dyn GrowthObserver>,
}

impl Collaborators {
    /// Default collaborators for a configuration.
    ///
    /// A `ChaCha8Rng` seeded from `config.seed`, a clock advancing one tick
    /// per growth step, and an observer that ignores every notification.
    #[must_use]
    pub fn for_config(config: &SpeciesConfig) -> Self {
        Self {
            rng: Box::new(seeded(config.seed)),
            clock: Box::new(FixedStepClock::new(config.breath.tick_interval())),
            observer: Box::new(NoopObserver),
        }
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RandomSource + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    /// Replaces the logical clock.
    #[must_use]
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the notification sink.
    #[must_use]
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: GrowthObserver + 'static,
    {
        self.observer = Box::new(observer);
        self
    }
}
