use std::time::Duration;

use breath_garden_core::{sanitize_force, BreathTuning};

/// Phase of the two-state breath machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BreathPhase {
    /// No breath in progress; a rising edge may fire a saccade.
    Idle,
    /// A breath is in progress; waits for the force to fall below the end threshold.
    Breathing,
}

/// Discrete breath pulse detected in the force stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationEvent {
    saccade_count: usize,
    at: Duration,
}

impl ActivationEvent {
    /// Running saccade count including this event, starting at one.
    #[must_use]
    pub const fn saccade_count(&self) -> usize {
        self.saccade_count
    }

    /// Logical time at which the saccade fired.
    #[must_use]
    pub const fn at(&self) -> Duration {
        self.at
    }
}

/// Hysteresis detector emitting one event per qualifying rising edge.
#[derive(Clone, Debug)]
pub struct SaccadeDetector {
    start_threshold: f32,
    end_threshold: f32,
    cooldown: Duration,
    phase: BreathPhase,
    last_saccade: Option<Duration>,
    saccade_count: usize,
}

impl SaccadeDetector {
    /// Creates an Idle detector using the provided thresholds.
    #[must_use]
    pub fn new(tuning: &BreathTuning) -> Self {
        Self {
            start_threshold: tuning.breath_start_threshold,
            end_threshold: tuning.breath_end_threshold,
            cooldown: tuning.saccade_cooldown(),
            phase: BreathPhase::Idle,
            last_saccade: None,
            saccade_count: 0,
        }
    }

    /// Feeds one force sample; invalid samples count as zero force.
    ///
    /// A rising edge inside the cooldown window leaves the detector Idle.
    pub fn observe(&mut self, force: f32, now: Duration) -> Option<ActivationEvent> {
        let force = sanitize_force(force);
        match self.phase {
            BreathPhase::Idle => {
                if force <= self.start_threshold || !self.cooled_down(now) {
                    return None;
                }
                self.phase = BreathPhase::Breathing;
                self.last_saccade = Some(now);
                self.saccade_count += 1;
                Some(ActivationEvent {
                    saccade_count: self.saccade_count,
                    at: now,
                })
            }
            BreathPhase::Breathing => {
                if force < self.end_threshold {
                    self.phase = BreathPhase::Idle;
                }
                None
            }
        }
    }

    /// Returns the detector to Idle with a zero saccade count.
    pub fn reset(&mut self) {
        self.phase = BreathPhase::Idle;
        self.last_saccade = None;
        self.saccade_count = 0;
    }

    /// Current phase of the detector.
    #[must_use]
    pub const fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Saccades detected since construction or the last reset.
    #[must_use]
    pub const fn saccade_count(&self) -> usize {
        self.saccade_count
    }

    /// Logical time of the most recent saccade.
    #[must_use]
    pub const fn last_saccade(&self) -> Option<Duration> {
        self.last_saccade
    }

    fn cooled_down(&self, now: Duration) -> bool {
        match self.last_saccade {
            None => true,
            Some(last) => now.saturating_sub(last) > self.cooldown,
        }
    }
}
