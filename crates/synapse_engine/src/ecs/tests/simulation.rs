//! End-to-end simulation tests wiring the reference system composition
//! (gate rotation, locking, integration) against one world

use std::cell::RefCell;
use std::f64::consts::FRAC_PI_3;
use std::rc::Rc;

use crate::ecs::components::{Body, GateState, Ion, Potential, ReceptorKind, Target};
use crate::ecs::events::{EventKind, GameEvent};
use crate::ecs::systems::{GateRotationSystem, IntegrationSystem, LockingSystem};
use crate::ecs::{Entity, World};

const TICK_MS: f64 = 16.0;

/// A world with the reference systems registered in order and one AMPA
/// receptor (stationary window, open gate) that also integrates potentials
fn synapse_world() -> (World, Entity) {
    let mut world = World::new();

    let receptor = world.create_entity();
    world.add_component(
        receptor,
        Target::new(ReceptorKind::Ampa, 0.0, FRAC_PI_3, 2000.0),
    );
    world.add_component(receptor, GateState::open());
    world.add_component(receptor, Body::new(400.0, 300.0));
    world.add_component(receptor, Potential::resting(-70.0, -55.0));

    let integration = IntegrationSystem::new(world.event_bus());
    world.add_system(Box::new(GateRotationSystem::new()));
    world.add_system(Box::new(LockingSystem::new()));
    world.add_system(Box::new(integration));

    (world, receptor)
}

fn event_log(world: &World, kinds: &[EventKind]) -> Rc<RefCell<Vec<GameEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    for &kind in kinds {
        let sink = Rc::clone(&events);
        world.event_bus().on(kind, move |event| {
            sink.borrow_mut().push(event.clone());
        });
    }
    events
}

#[test]
fn test_lock_feeds_the_integrator_in_the_same_tick() {
    let (mut world, receptor) = synapse_world();
    let events = event_log(&world, &[EventKind::IonLocked, EventKind::Epsp]);

    let ion = world.create_entity();
    world.add_component(ion, Ion::sodium());
    world.add_component(ion, Body::new(420.0, 300.0));

    world.update(TICK_MS);

    // The locking system ran before the integrator, so the EPSP it emitted
    // already nudged the membrane this tick
    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GameEvent::IonLocked { .. }));
    assert!(matches!(events[1], GameEvent::Epsp { .. }));

    assert!(!world.entity_exists(ion));
    let potential = world.get_component::<Potential>(receptor).unwrap();
    assert!(potential.vm > -70.0);
}

#[test]
fn test_gate_cycle_close_cooldown_reopen() {
    let (mut world, receptor) = synapse_world();
    let opened = event_log(&world, &[EventKind::GateOpened]);

    let ion = world.create_entity();
    world.add_component(ion, Ion::sodium());
    world.add_component(ion, Body::new(420.0, 300.0));

    // Tick 1: lock closes the gate at t = 16ms
    world.update(TICK_MS);
    let gate = world.get_component::<GateState>(receptor).unwrap();
    assert!(!gate.is_open);
    assert_eq!(gate.last_lock_at, TICK_MS);

    // The 2000ms cooldown ends between ticks 126 and 127
    let mut reopened_at = None;
    for tick in 2..=140 {
        world.update(TICK_MS);
        if world.get_component::<GateState>(receptor).unwrap().is_open {
            reopened_at = Some(tick);
            break;
        }
    }
    assert_eq!(reopened_at, Some(127));
    assert_eq!(opened.borrow().len(), 1);

    // Stays open with nothing left to lock
    for _ in 0..10 {
        world.update(TICK_MS);
    }
    assert_eq!(opened.borrow().len(), 1);
}

#[test]
fn test_second_ion_waits_for_the_cooldown() {
    let (mut world, _receptor) = synapse_world();
    let locks = event_log(&world, &[EventKind::IonLocked]);

    for _ in 0..2 {
        let ion = world.create_entity();
        world.add_component(ion, Ion::sodium());
        world.add_component(ion, Body::new(415.0, 300.0));
    }

    // First tick consumes one ion and closes the gate on the survivor
    world.update(TICK_MS);
    assert_eq!(locks.borrow().len(), 1);
    assert_eq!(world.entities_with(&[crate::ecs::ComponentKind::Ion]).len(), 1);

    // The second ion cannot lock until the gate reopens
    for _ in 0..125 {
        world.update(TICK_MS);
    }
    assert_eq!(locks.borrow().len(), 1);

    for _ in 0..5 {
        world.update(TICK_MS);
    }
    assert_eq!(locks.borrow().len(), 2);
    assert!(world.entities_with(&[crate::ecs::ComponentKind::Ion]).is_empty());
}

#[test]
fn test_destroying_the_receptor_mid_run_is_harmless() {
    let (mut world, receptor) = synapse_world();
    let spikes = event_log(&world, &[EventKind::ActionPotential]);

    world.event_bus().emit(&GameEvent::Epsp {
        entity: receptor,
        strength: 1200.0,
        timestamp: 0.0,
    });
    for _ in 0..5 {
        world.update(TICK_MS);
    }

    world.destroy_entity(receptor);
    for _ in 0..100 {
        world.update(TICK_MS);
    }

    // No membrane left to spike, no stale inputs resurrect it
    assert!(spikes.borrow().is_empty());
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn test_clear_resets_the_whole_composition() {
    let (mut world, _receptor) = synapse_world();
    world.update(TICK_MS);

    world.clear();
    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.now(), 0.0);
    // Integration teardown dropped its synaptic subscriptions with it
    assert_eq!(world.event_bus().listener_count(EventKind::Epsp), 0);
    assert_eq!(world.event_bus().listener_count(EventKind::Ipsp), 0);

    world.clear();
    assert_eq!(world.entity_count(), 0);
}
