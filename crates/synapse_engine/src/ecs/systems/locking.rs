//! Locking system
//!
//! Pairs free ions against open receptor gates. A lock requires proximity,
//! species compatibility, and an approach angle inside the gate's current
//! acceptance window; on success the ion is consumed and the synaptic event
//! is published for the integrator.

use log::debug;

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{Body, GateState, Ion, Target};
use crate::ecs::events::GameEvent;
use crate::ecs::system::System;
use crate::ecs::world::World;

use super::gate_rotation::angle_in_window;

/// Maximum ion-to-receptor distance for a lock, in world units
const LOCK_DISTANCE: f64 = 30.0;

/// Base synaptic strength per unit of ion charge
const CHARGE_STRENGTH_SCALE: f64 = 0.1;

/// Evaluates ion/receptor locks once per tick
///
/// An ion locks onto at most one target per tick: it is destroyed on its
/// first successful lock, which ends its target scan.
#[derive(Debug, Default)]
pub struct LockingSystem;

impl LockingSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }

    fn complete_lock(
        ion_id: crate::ecs::Entity,
        target_id: crate::ecs::Entity,
        ion: Ion,
        target: Target,
        world: &mut World,
    ) {
        let now = world.now();

        if let Some(gate) = world.get_component_mut::<GateState>(target_id) {
            gate.is_open = false;
            gate.last_lock_at = now;
        }

        world.event_bus().emit(&GameEvent::IonLocked {
            ion: ion_id,
            target: target_id,
            timestamp: now,
        });

        let strength = ion.charge.abs() * CHARGE_STRENGTH_SCALE * target.kind.strength_multiplier();
        let synaptic_event = if target.kind.is_excitatory() {
            GameEvent::Epsp {
                entity: target_id,
                strength,
                timestamp: now,
            }
        } else {
            GameEvent::Ipsp {
                entity: target_id,
                strength,
                timestamp: now,
            }
        };
        world.event_bus().emit(&synaptic_event);

        debug!(
            "ion {} locked onto target {} (strength {strength:.3})",
            ion_id.id(),
            target_id.id()
        );

        // The ion has been consumed
        world.destroy_entity(ion_id);
    }
}

impl System for LockingSystem {
    fn update(&mut self, _delta_time: f64, world: &mut World) {
        let ions = world.entities_with(&[ComponentKind::Ion, ComponentKind::Body]);
        let targets = world.entities_with(&[
            ComponentKind::Target,
            ComponentKind::GateState,
            ComponentKind::Body,
        ]);

        for ion_id in ions {
            let Some(ion) = world.get_component::<Ion>(ion_id).copied() else {
                continue;
            };
            let Some(ion_body) = world.get_component::<Body>(ion_id).copied() else {
                continue;
            };

            for &target_id in &targets {
                let Some(target) = world.get_component::<Target>(target_id).copied() else {
                    continue;
                };
                let Some(gate) = world.get_component::<GateState>(target_id).copied() else {
                    continue;
                };
                let Some(target_body) = world.get_component::<Body>(target_id).copied() else {
                    continue;
                };

                if !gate.is_open {
                    continue;
                }

                let delta = ion_body.position - target_body.position;
                if delta.norm() > LOCK_DISTANCE {
                    continue;
                }

                if !target.kind.accepts(ion.kind) {
                    continue;
                }

                let approach_angle = delta.y.atan2(delta.x);
                if !angle_in_window(approach_angle, target.open_angle, target.arc) {
                    continue;
                }

                Self::complete_lock(ion_id, target_id, ion, target, world);
                break;
            }
        }
    }
}
