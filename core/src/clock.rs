use std::{cell::Cell, rc::Rc, time::Duration};

/// Logical time source consulted once per stem growth tick.
pub trait Clock {
    /// Returns the logical timestamp of the tick being processed.
    fn now(&mut self) -> Duration;
}

/// Clock that advances by a fixed step every time it is read.
///
/// The first reading is zero.
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    step: Duration,
    next: Duration,
}

impl FixedStepClock {
    /// Creates a clock advancing by `step` per reading.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self {
            step,
            next: Duration::ZERO,
        }
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> Duration {
        let now = self.next;
        self.next = self.next.saturating_add(self.step);
        now
    }
}

/// Clock whose time is set explicitly through shared handles.
///
/// Clones observe and control the same timestamp, so a test can keep one
/// handle while the manager owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a manual clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to an absolute timestamp.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_clock_starts_at_zero() {
        let mut clock = FixedStepClock::new(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn manual_clock_handles_share_time() {
        let handle = ManualClock::new();
        let mut owned = handle.clone();
        handle.set(Duration::from_millis(400));
        assert_eq!(owned.now(), Duration::from_millis(400));
        handle.advance(Duration::from_millis(50));
        assert_eq!(owned.now(), Duration::from_millis(450));
    }
}
