//! Gate rotation system
//!
//! Rotates every receptor's acceptance window and reopens gates whose
//! post-lock cooldown has elapsed. Also home to the angle-window membership
//! helpers the locking system shares.

use std::f64::consts::TAU;

use log::debug;

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{GateState, Target};
use crate::ecs::events::GameEvent;
use crate::ecs::system::System;
use crate::ecs::world::World;

/// Normalize an angle into [0, 2pi)
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Whether an approach angle falls inside a gate's acceptance window
///
/// The window is `center +/- arc / 2` with inclusive edges. Windows that
/// straddle the 0/2pi seam wrap correctly: the membership test splits into
/// "past the start or before the end".
pub fn angle_in_window(approach: f64, center: f64, arc: f64) -> bool {
    let approach = normalize_angle(approach);
    let half_arc = arc / 2.0;
    let start = normalize_angle(center - half_arc);
    let end = normalize_angle(center + half_arc);

    if start > end {
        approach >= start || approach <= end
    } else {
        approach >= start && approach <= end
    }
}

/// Advances gate windows and reopens cooled-down gates
///
/// Together with the locking system this is the sole owner of
/// `GateState.is_open` and `Target.open_angle`.
#[derive(Debug, Default)]
pub struct GateRotationSystem;

impl GateRotationSystem {
    /// Create the system
    pub const fn new() -> Self {
        Self
    }
}

impl System for GateRotationSystem {
    fn update(&mut self, delta_time: f64, world: &mut World) {
        let now = world.now();
        let gated = world.entities_with(&[ComponentKind::Target, ComponentKind::GateState]);

        for entity in gated {
            let Some(target) = world.get_component::<Target>(entity).copied() else {
                continue;
            };
            let Some(gate) = world.get_component::<GateState>(entity).copied() else {
                continue;
            };

            // Reopen once the cooldown since the last lock has elapsed
            if !gate.is_open && now - gate.last_lock_at > target.cooldown_ms {
                if let Some(gate) = world.get_component_mut::<GateState>(entity) {
                    gate.is_open = true;
                }
                debug!("gate {} reopened at {now:.1}ms", entity.id());
                world.event_bus().emit(&GameEvent::GateOpened {
                    entity,
                    timestamp: now,
                });
            }

            // The window rotates whether or not the gate is open
            let rotated = target.open_angle + target.gate_speed * (delta_time / 1000.0);
            if let Some(target) = world.get_component_mut::<Target>(entity) {
                target.open_angle = normalize_angle(rotated);
            }
        }
    }
}
