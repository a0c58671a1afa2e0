//! Cursor field system
//!
//! Applies an inverse-square attraction/repulsion between the player's
//! cursor and every ion. The input layer owns the shared [`CursorField`]
//! handle (position and polarity); the physics collaborator receives the
//! computed forces through a sink callback and does the actual pushing.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Point2, Vector2};

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{Body, Ion};
use crate::ecs::entity::Entity;
use crate::ecs::system::System;
use crate::ecs::world::World;

/// Maximum distance at which the cursor influences an ion, in world units
const MAX_FIELD_DISTANCE: f64 = 200.0;

/// Field coupling constant (force = charge * polarity * coupling / d^2)
const FIELD_COUPLING: f64 = 0.001;

/// Shared cursor state written by the external input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorField {
    /// Cursor position in world units
    pub position: Point2<f64>,
    /// +1.0 attracts positive charges' opposites; clicking flips it
    pub polarity: f64,
}

impl CursorField {
    /// Create a positive-polarity field at the given position
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            polarity: 1.0,
        }
    }

    /// Flip the field polarity (pointer-down behavior)
    pub fn toggle_polarity(&mut self) {
        self.polarity = -self.polarity;
    }
}

/// Sink receiving one force per affected ion per tick
pub type ForceSink = Box<dyn FnMut(Entity, Vector2<f64>)>;

/// Computes cursor-field forces on ions
pub struct CursorFieldSystem {
    field: Rc<RefCell<CursorField>>,
    forces: ForceSink,
}

impl CursorFieldSystem {
    /// Create the system around a shared cursor handle and a force sink
    pub fn new(field: Rc<RefCell<CursorField>>, forces: ForceSink) -> Self {
        Self { field, forces }
    }
}

impl System for CursorFieldSystem {
    fn update(&mut self, _delta_time: f64, world: &mut World) {
        let CursorField { position, polarity } = *self.field.borrow();

        for entity in world.entities_with(&[ComponentKind::Ion, ComponentKind::Body]) {
            let Some(ion) = world.get_component::<Ion>(entity).copied() else {
                continue;
            };
            let Some(body) = world.get_component::<Body>(entity).copied() else {
                continue;
            };

            let delta = position - body.position;
            let distance_squared = delta.norm_squared();
            if distance_squared == 0.0 {
                continue;
            }

            let distance = distance_squared.sqrt();
            if distance > MAX_FIELD_DISTANCE {
                continue;
            }

            let magnitude = ion.charge * polarity * FIELD_COUPLING / distance_squared;
            (self.forces)(entity, delta / distance * magnitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn force_capture() -> (ForceSink, Rc<RefCell<Vec<(Entity, Vector2<f64>)>>>) {
        let captured = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&captured);
        let forces: ForceSink = Box::new(move |entity, force| {
            sink.borrow_mut().push((entity, force));
        });
        (forces, captured)
    }

    fn world_with_ion(ion: Ion, x: f64, y: f64) -> (World, Entity) {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, ion);
        world.add_component(entity, Body::new(x, y));
        (world, entity)
    }

    #[test]
    fn test_force_points_toward_cursor_for_positive_charge() {
        let (mut world, entity) = world_with_ion(Ion::sodium(), 0.0, 0.0);
        let field = Rc::new(RefCell::new(CursorField::new(100.0, 0.0)));
        let (forces, captured) = force_capture();
        let mut system = CursorFieldSystem::new(field, forces);

        system.update(16.0, &mut world);

        let captured = captured.borrow();
        assert_eq!(captured.len(), 1);
        let (affected, force) = captured[0];
        assert_eq!(affected, entity);
        assert!(force.x > 0.0);
        assert_relative_eq!(force.y, 0.0);
        // charge 1 * polarity 1 * 0.001 / 100^2
        assert_relative_eq!(force.x, 1e-7, epsilon = 1e-12);
    }

    #[test]
    fn test_polarity_flip_reverses_force() {
        let (mut world, _entity) = world_with_ion(Ion::sodium(), 0.0, 0.0);
        let field = Rc::new(RefCell::new(CursorField::new(100.0, 0.0)));
        let (forces, captured) = force_capture();
        let mut system = CursorFieldSystem::new(Rc::clone(&field), forces);

        system.update(16.0, &mut world);
        field.borrow_mut().toggle_polarity();
        system.update(16.0, &mut world);

        let captured = captured.borrow();
        assert_eq!(captured.len(), 2);
        assert_relative_eq!(captured[0].1.x, -captured[1].1.x);
    }

    #[test]
    fn test_negative_charge_is_repelled() {
        let (mut world, _entity) = world_with_ion(Ion::chloride(), 0.0, 0.0);
        let field = Rc::new(RefCell::new(CursorField::new(50.0, 50.0)));
        let (forces, captured) = force_capture();
        let mut system = CursorFieldSystem::new(field, forces);

        system.update(16.0, &mut world);

        let force = captured.borrow()[0].1;
        assert!(force.x < 0.0);
        assert!(force.y < 0.0);
    }

    #[test]
    fn test_field_has_finite_reach() {
        let (mut world, _entity) = world_with_ion(Ion::sodium(), 0.0, 0.0);
        let field = Rc::new(RefCell::new(CursorField::new(300.0, 0.0)));
        let (forces, captured) = force_capture();
        let mut system = CursorFieldSystem::new(field, forces);

        system.update(16.0, &mut world);
        assert!(captured.borrow().is_empty());
    }

    #[test]
    fn test_ion_under_the_cursor_is_skipped() {
        let (mut world, _entity) = world_with_ion(Ion::sodium(), 25.0, 25.0);
        let field = Rc::new(RefCell::new(CursorField::new(25.0, 25.0)));
        let (forces, captured) = force_capture();
        let mut system = CursorFieldSystem::new(field, forces);

        system.update(16.0, &mut world);
        assert!(captured.borrow().is_empty());
    }
}
