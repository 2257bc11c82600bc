#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Saccade detection and activation ordering.
//!
//! The [`SaccadeDetector`] watches the breath force stream for qualifying
//! rising edges. Every saccade advances through an [`ActivationOrderPool`]
//! shuffled once per reset, and [`Saccades`] resolves the pool entry into the
//! [`Activation`] the plant manager must carry out.

mod detector;
mod pool;

use std::time::Duration;

use breath_garden_core::{Activation, BreathTuning, GroupId, RandomSource};

pub use detector::{ActivationEvent, BreathPhase, SaccadeDetector};
pub use pool::ActivationOrderPool;

/// Pure system translating breath samples into group activations.
#[derive(Debug)]
pub struct Saccades {
    detector: SaccadeDetector,
    pool: ActivationOrderPool,
}

impl Saccades {
    /// Creates the system with a freshly shuffled pool of `max_groups` groups.
    #[must_use]
    pub fn new(tuning: &BreathTuning, max_groups: usize, rng: &mut dyn RandomSource) -> Self {
        Self {
            detector: SaccadeDetector::new(tuning),
            pool: ActivationOrderPool::new(max_groups, rng),
        }
    }

    /// Feeds one force sample observed at the logical time `now`.
    ///
    /// Returns the activation triggered by the sample, if any. Saccades past
    /// the end of the pool are still counted but activate nothing.
    pub fn observe(&mut self, force: f32, now: Duration) -> Option<Activation> {
        let event = self.detector.observe(force, now)?;
        let group = self.pool.get(event.saccade_count())?;
        if group == GroupId::INITIAL {
            Some(Activation::Reactivate(group))
        } else {
            Some(Activation::Plant(group))
        }
    }

    /// Returns the detector to Idle and reshuffles the activation order.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.detector.reset();
        self.pool.reshuffle(rng);
    }

    /// Number of saccades detected since the last reset.
    #[must_use]
    pub const fn saccade_count(&self) -> usize {
        self.detector.saccade_count()
    }

    /// Read-only access to the detector.
    #[must_use]
    pub const fn detector(&self) -> &SaccadeDetector {
        &self.detector
    }

    /// Read-only access to the activation order.
    #[must_use]
    pub const fn pool(&self) -> &ActivationOrderPool {
        &self.pool
    }
}
