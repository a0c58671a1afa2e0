//! # Synapse Engine
//!
//! A micro Entity-Component-System runtime driving a synaptic-signaling
//! simulation: ions diffuse through an external physics field, receptor
//! gates rotate their acceptance windows, compatible ions lock onto open
//! gates, and membrane potentials integrate the resulting synaptic events
//! until they spike.
//!
//! The crate deliberately stops at the simulation boundary: rendering,
//! physics integration, and input handling are external collaborators that
//! talk to the core through the `Body` position component, the
//! [`CursorField`](ecs::systems::CursorField) handle, and the event bus.
//!
//! ## Quick Start
//!
//! ```rust
//! use synapse_engine::ecs::World;
//! use synapse_engine::ecs::components::{Ion, Body, Renderable, RenderLayer};
//! use synapse_engine::ecs::systems::{GateRotationSystem, LockingSystem, IntegrationSystem};
//!
//! let mut world = World::new();
//!
//! let ion = world.create_entity();
//! world.add_component(ion, Ion::sodium());
//! world.add_component(ion, Body::new(200.0, 200.0));
//! world.add_component(ion, Renderable::new(RenderLayer::Ions));
//!
//! let integration = IntegrationSystem::new(world.event_bus());
//! world.add_system(Box::new(GateRotationSystem::new()));
//! world.add_system(Box::new(LockingSystem::new()));
//! world.add_system(Box::new(integration));
//!
//! world.update(16.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{
            components::{
                Body, Breathing, GateState, Ion, IonKind, LayerMask, Potential, Renderable,
                RenderLayer, ReceptorKind, SplineEdge, Target,
            },
            systems::{
                CursorField, CursorFieldSystem, GateRotationSystem, IntegrationSystem,
                LockingSystem,
            },
            ComponentKind, Entity, EventBus, EventKind, GameEvent, ListenerHandle, System,
            SystemHandle, World,
        },
    };
}
