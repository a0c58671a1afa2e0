//! Integration system
//!
//! Integrates synaptic inputs into membrane potentials: each tick the
//! membrane relaxes toward rest, pending EPSP/IPSP inputs contribute their
//! exponentially decayed strength, and a threshold crossing fires an action
//! potential and resets the membrane.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::ecs::component::ComponentKind;
use crate::ecs::components::Potential;
use crate::ecs::entity::Entity;
use crate::ecs::events::{EventBus, EventKind, GameEvent, ListenerHandle};
use crate::ecs::system::System;
use crate::ecs::world::World;

/// EPSP decay time constant, in milliseconds
const TAU_EPSP_MS: f64 = 500.0;

/// IPSP decay time constant, in milliseconds
const TAU_IPSP_MS: f64 = 800.0;

/// Fraction of the distance to rest the membrane relaxes per tick
const REST_DECAY_RATE: f64 = 0.01;

/// Scale applied to a decayed input before it reaches the membrane
const INPUT_SCALE: f64 = 0.001;

/// Inputs whose decayed magnitude falls to this level are discarded
const INPUT_FLOOR: f64 = 0.001;

/// Hard bounds on the membrane potential, in millivolts
const VM_MIN: f64 = -100.0;
const VM_MAX: f64 = 50.0;

/// One queued synaptic input (IPSP strengths are stored negated)
#[derive(Debug, Clone, Copy)]
struct SynapticInput {
    strength: f64,
    timestamp: f64,
    decay_ms: f64,
}

type PendingInputs = HashMap<Entity, Vec<SynapticInput>>;

/// Accumulates synaptic events and integrates membrane potentials
///
/// Subscribes to `Epsp`/`Ipsp` exactly once, at construction; the pending
/// input lists are the one piece of state a system keeps between ticks.
/// Entries for entities that lost their `Potential` component (or were
/// destroyed) are discarded on the next tick.
pub struct IntegrationSystem {
    pending: Rc<RefCell<PendingInputs>>,
    subscriptions: Vec<(EventKind, ListenerHandle)>,
}

impl IntegrationSystem {
    /// Create the system and subscribe its synaptic-event listeners
    pub fn new(bus: &EventBus) -> Self {
        let pending: Rc<RefCell<PendingInputs>> = Rc::new(RefCell::new(HashMap::new()));
        let mut subscriptions = Vec::with_capacity(2);

        let sink = Rc::clone(&pending);
        let handle = bus.on(EventKind::Epsp, move |event| {
            if let GameEvent::Epsp {
                entity,
                strength,
                timestamp,
            } = *event
            {
                sink.borrow_mut().entry(entity).or_default().push(SynapticInput {
                    strength,
                    timestamp,
                    decay_ms: TAU_EPSP_MS,
                });
            }
        });
        subscriptions.push((EventKind::Epsp, handle));

        let sink = Rc::clone(&pending);
        let handle = bus.on(EventKind::Ipsp, move |event| {
            if let GameEvent::Ipsp {
                entity,
                strength,
                timestamp,
            } = *event
            {
                sink.borrow_mut().entry(entity).or_default().push(SynapticInput {
                    strength: -strength,
                    timestamp,
                    decay_ms: TAU_IPSP_MS,
                });
            }
        });
        subscriptions.push((EventKind::Ipsp, handle));

        Self {
            pending,
            subscriptions,
        }
    }

    /// Number of inputs currently queued for an entity
    pub fn pending_input_count(&self, entity: Entity) -> usize {
        self.pending.borrow().get(&entity).map_or(0, Vec::len)
    }
}

impl System for IntegrationSystem {
    fn update(&mut self, _delta_time: f64, world: &mut World) {
        let now = world.now();
        let membranes = world.entities_with(&[ComponentKind::Potential]);

        for entity in membranes {
            let Some(mut potential) = world.get_component::<Potential>(entity).copied() else {
                continue;
            };

            // Relax toward the resting potential
            potential.vm += (potential.vrest - potential.vm) * REST_DECAY_RATE;

            // Apply every live input; drop the ones that have decayed away
            {
                let mut pending = self.pending.borrow_mut();
                let inputs = pending.entry(entity).or_default();
                inputs.retain(|input| {
                    let age = now - input.timestamp;
                    let decayed = input.strength * (-age / input.decay_ms).exp();
                    if decayed.abs() > INPUT_FLOOR {
                        potential.vm += decayed * INPUT_SCALE;
                        true
                    } else {
                        false
                    }
                });
            }

            if potential.vm >= potential.threshold {
                debug!("action potential on entity {} at {now:.1}ms", entity.id());
                world.event_bus().emit(&GameEvent::ActionPotential {
                    entity,
                    timestamp: now,
                });
                potential.vm = potential.vrest;
            }

            potential.vm = potential.vm.clamp(VM_MIN, VM_MAX);

            if let Some(stored) = world.get_component_mut::<Potential>(entity) {
                *stored = potential;
            }
        }

        // Inputs for entities that no longer integrate are stale
        self.pending
            .borrow_mut()
            .retain(|entity, _| world.has_component::<Potential>(*entity));
    }

    fn teardown(&mut self, world: &mut World) {
        for (kind, handle) in self.subscriptions.drain(..) {
            world.event_bus().off(kind, handle);
        }
        self.pending.borrow_mut().clear();
    }
}
