//! System trait

use super::world::World;

/// Logic unit invoked once per world tick
///
/// Systems hold no component state between ticks (the integration system's
/// private pending-input lists are the documented exception); everything
/// they read or mutate lives in the world's stores or flows through the
/// event bus.
pub trait System {
    /// Advance the system by `delta_time` milliseconds
    ///
    /// Mutations to component stores and events emitted here are visible to
    /// systems that run later in the same tick.
    fn update(&mut self, delta_time: f64, world: &mut World);

    /// Called when the system is removed from the world or the world is
    /// cleared. Override to release subscriptions or private state.
    fn teardown(&mut self, world: &mut World) {
        let _ = world;
    }
}
