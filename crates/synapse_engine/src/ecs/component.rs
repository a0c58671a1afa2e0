//! Component trait and the closed set of component kinds

use super::storage::ComponentStore;
use super::world::World;

/// The closed set of component kinds known to the world
///
/// Per-kind dispatch (queries, destroy-time purging, clearing) is an
/// exhaustive `match` over this enum, so adding a kind without wiring its
/// store is a compile error rather than a silent "unknown tag".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Mobile charged particle
    Ion,
    /// Read-only position supplied by the physics collaborator
    Body,
    /// Receptor/channel with a rotating acceptance window
    Target,
    /// Receptor open/closed status
    GateState,
    /// Membrane-potential integrator state
    Potential,
    /// Layer tag read by the rendering collaborator
    Renderable,
    /// Signal-propagation path read by the rendering collaborator
    SplineEdge,
    /// Pulsing-animation parameters read by the fx renderer
    Breathing,
}

impl ComponentKind {
    /// Every component kind, in declaration order
    pub const ALL: [Self; 8] = [
        Self::Ion,
        Self::Body,
        Self::Target,
        Self::GateState,
        Self::Potential,
        Self::Renderable,
        Self::SplineEdge,
        Self::Breathing,
    ];
}

/// Trait tying a component type to its kind and its store inside the world
///
/// Implemented in `world.rs` for every type in [`ComponentKind`]; the
/// accessors are the compile-time-checked mapping from kind to value type.
pub trait Component: Sized + 'static {
    /// The kind this component type registers as
    const KIND: ComponentKind;

    /// The world's store for this component type
    fn store(world: &World) -> &ComponentStore<Self>;

    /// The world's store for this component type, mutable
    fn store_mut(world: &mut World) -> &mut ComponentStore<Self>;
}
