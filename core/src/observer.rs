use crate::{FlowerId, StemId};

/// Capability notified synchronously when notable structures appear.
///
/// Implementations must return promptly; the engine calls them from inside a
/// growth tick. Both hooks default to doing nothing.
pub trait GrowthObserver {
    /// Called once when a primary stem is created at its base position.
    fn on_stem_created(&mut self, _x: f32, _y: f32, _id: StemId) {}

    /// Called once when a flower first grows past its visibility threshold.
    fn on_flower_created(&mut self, _x: f32, _y: f32, _id: FlowerId) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl GrowthObserver for NoopObserver {}
