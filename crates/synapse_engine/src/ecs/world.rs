//! ECS World implementation
//!
//! The world composes the entity manager, one typed store per component
//! kind, the ordered system list, the shared event bus, and the simulation
//! clock. It is the only shared state in the engine: systems communicate
//! exclusively through its stores and its bus.

use log::debug;

use super::component::{Component, ComponentKind};
use super::components::{
    Body, Breathing, GateState, Ion, Potential, Renderable, SplineEdge, Target,
};
use super::entity::{Entity, EntityManager};
use super::events::EventBus;
use super::storage::ComponentStore;
use super::system::System;

/// Handle identifying one system registration
///
/// Returned by [`World::add_system`] and accepted by
/// [`World::remove_system`]; boxed trait objects have no usable identity,
/// so the handle stands in for remove-by-instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemHandle(u64);

/// ECS World containing all entities, components, and systems
pub struct World {
    entities: EntityManager,
    clock_ms: f64,

    ions: ComponentStore<Ion>,
    bodies: ComponentStore<Body>,
    targets: ComponentStore<Target>,
    gate_states: ComponentStore<GateState>,
    potentials: ComponentStore<Potential>,
    renderables: ComponentStore<Renderable>,
    spline_edges: ComponentStore<SplineEdge>,
    breathings: ComponentStore<Breathing>,

    systems: Vec<(SystemHandle, Box<dyn System>)>,
    next_system_id: u64,
    event_bus: EventBus,
}

impl World {
    /// Create an empty world with the clock at zero
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            clock_ms: 0.0,
            ions: ComponentStore::new(),
            bodies: ComponentStore::new(),
            targets: ComponentStore::new(),
            gate_states: ComponentStore::new(),
            potentials: ComponentStore::new(),
            renderables: ComponentStore::new(),
            spline_edges: ComponentStore::new(),
            breathings: ComponentStore::new(),
            systems: Vec::new(),
            next_system_id: 0,
            event_bus: EventBus::new(),
        }
    }

    /// Current simulation time in milliseconds
    ///
    /// Accumulated from the `delta_time` values passed to [`World::update`];
    /// every timestamp in the engine (gate cooldowns, event timestamps,
    /// synaptic-input ages) is expressed on this clock.
    pub const fn now(&self) -> f64 {
        self.clock_ms
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create()
    }

    /// Destroy an entity and remove all its components
    ///
    /// Every store is purged before the manager forgets the id, so no store
    /// retains a stale entry once this returns. Destroying a dead or unknown
    /// entity is a no-op.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.ions.remove(entity);
        self.bodies.remove(entity);
        self.targets.remove(entity);
        self.gate_states.remove(entity);
        self.potentials.remove(entity);
        self.renderables.remove(entity);
        self.spline_edges.remove(entity);
        self.breathings.remove(entity);
        self.entities.destroy(entity);
    }

    /// Check whether an entity is alive
    pub fn entity_exists(&self, entity: Entity) -> bool {
        self.entities.exists(entity)
    }

    /// Number of alive entities
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attach a component to an entity, replacing any existing value
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) {
        C::store_mut(self).add(entity, component);
    }

    /// Get a component of an entity
    ///
    /// `None` means "skip this entity for this purpose", never an error.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::store(self).get(entity)
    }

    /// Get a component of an entity mutably
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::store_mut(self).get_mut(entity)
    }

    /// Detach a component from an entity
    ///
    /// Returns `true` if a component was actually removed.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> bool {
        C::store_mut(self).remove(entity)
    }

    /// Check whether an entity holds a component type
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        C::store(self).has(entity)
    }

    /// Check whether an entity holds a component kind
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Ion => self.ions.has(entity),
            ComponentKind::Body => self.bodies.has(entity),
            ComponentKind::Target => self.targets.has(entity),
            ComponentKind::GateState => self.gate_states.has(entity),
            ComponentKind::Potential => self.potentials.has(entity),
            ComponentKind::Renderable => self.renderables.has(entity),
            ComponentKind::SplineEdge => self.spline_edges.has(entity),
            ComponentKind::Breathing => self.breathings.has(entity),
        }
    }

    /// The store for one component type
    pub fn store<C: Component>(&self) -> &ComponentStore<C> {
        C::store(self)
    }

    /// Entities holding every listed component kind
    ///
    /// With no kinds, all alive entities in creation order. Otherwise the
    /// intersection, enumerated in the first kind's store order (which is
    /// unspecified across runs).
    pub fn entities_with(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        let Some(&first) = kinds.first() else {
            return self.entities.all();
        };

        self.entities_of(first)
            .into_iter()
            .filter(|entity| kinds.iter().all(|kind| self.has_kind(*entity, *kind)))
            .collect()
    }

    fn entities_of(&self, kind: ComponentKind) -> Vec<Entity> {
        match kind {
            ComponentKind::Ion => self.ions.entities().collect(),
            ComponentKind::Body => self.bodies.entities().collect(),
            ComponentKind::Target => self.targets.entities().collect(),
            ComponentKind::GateState => self.gate_states.entities().collect(),
            ComponentKind::Potential => self.potentials.entities().collect(),
            ComponentKind::Renderable => self.renderables.entities().collect(),
            ComponentKind::SplineEdge => self.spline_edges.entities().collect(),
            ComponentKind::Breathing => self.breathings.entities().collect(),
        }
    }

    // =========================================================================
    // Systems and ticking
    // =========================================================================

    /// Append a system; run order is registration order
    pub fn add_system(&mut self, system: Box<dyn System>) -> SystemHandle {
        let handle = SystemHandle(self.next_system_id);
        self.next_system_id += 1;
        self.systems.push((handle, system));
        handle
    }

    /// Remove a system registration and invoke its teardown hook
    ///
    /// Returns `true` if the handle was registered. Systems currently
    /// executing a tick cannot be removed until the tick finishes.
    pub fn remove_system(&mut self, handle: SystemHandle) -> bool {
        let Some(index) = self.systems.iter().position(|(h, _)| *h == handle) else {
            return false;
        };
        let (_, mut system) = self.systems.remove(index);
        system.teardown(self);
        true
    }

    /// Advance the simulation clock and run every system once, in
    /// registration order
    ///
    /// Mutations and events produced by a system are visible to systems that
    /// run later in the same tick. Systems registered during the tick start
    /// running next tick, appended after the current registrations.
    pub fn update(&mut self, delta_time: f64) {
        self.clock_ms += delta_time;

        let mut running = std::mem::take(&mut self.systems);
        for (_, system) in &mut running {
            system.update(delta_time, self);
        }
        let added_during_tick = std::mem::replace(&mut self.systems, running);
        self.systems.extend(added_during_tick);
    }

    /// The shared event bus for inter-system communication
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Tear down every system, then clear all stores, entities, listeners,
    /// and the clock
    ///
    /// Safe to call repeatedly. Entity ids are not reset: a world reused
    /// after `clear` keeps issuing fresh ids.
    pub fn clear(&mut self) {
        let mut systems = std::mem::take(&mut self.systems);
        for (_, system) in &mut systems {
            system.teardown(self);
        }
        drop(systems);

        self.ions.clear();
        self.bodies.clear();
        self.targets.clear();
        self.gate_states.clear();
        self.potentials.clear();
        self.renderables.clear();
        self.spline_edges.clear();
        self.breathings.clear();
        self.entities.clear();
        self.event_bus.clear();
        self.clock_ms = 0.0;

        debug!("world cleared");
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Component registrations - every ComponentKind maps to exactly one store
// =============================================================================

impl Component for Ion {
    const KIND: ComponentKind = ComponentKind::Ion;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.ions
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.ions
    }
}

impl Component for Body {
    const KIND: ComponentKind = ComponentKind::Body;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.bodies
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.bodies
    }
}

impl Component for Target {
    const KIND: ComponentKind = ComponentKind::Target;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.targets
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.targets
    }
}

impl Component for GateState {
    const KIND: ComponentKind = ComponentKind::GateState;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.gate_states
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.gate_states
    }
}

impl Component for Potential {
    const KIND: ComponentKind = ComponentKind::Potential;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.potentials
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.potentials
    }
}

impl Component for Renderable {
    const KIND: ComponentKind = ComponentKind::Renderable;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.renderables
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.renderables
    }
}

impl Component for SplineEdge {
    const KIND: ComponentKind = ComponentKind::SplineEdge;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.spline_edges
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.spline_edges
    }
}

impl Component for Breathing {
    const KIND: ComponentKind = ComponentKind::Breathing;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.breathings
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.breathings
    }
}
