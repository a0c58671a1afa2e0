//! Headless synapse simulation demo
//!
//! Drives the engine the way the browser build does, with this binary
//! standing in for the external collaborators: it owns ion velocities and
//! applies cursor-field forces (physics), wanders the cursor and flips its
//! polarity (input), and reports events and layer counts (rendering/UI).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{info, warn};
use nalgebra::Vector2;

use synapse_engine::config::Config;
use synapse_engine::ecs::components::{Body, Ion, LayerMask, RenderLayer, Renderable};
use synapse_engine::ecs::systems::{
    CursorField, CursorFieldSystem, GateRotationSystem, IntegrationSystem, LockingSystem,
};
use synapse_engine::ecs::{ComponentKind, Entity, EventKind, GameEvent, World};

mod scene;

use scene::SceneConfig;

/// App-side gain converting the engine's field forces into px/s^2
const FORCE_GAIN: f64 = 5.0e8;

/// Per-tick velocity damping, matter.js frictionAir style
const AIR_FRICTION: f64 = 0.02;

/// How fast the demo cursor orbits the field center, in radians per second
const CURSOR_ORBIT_SPEED: f64 = 0.4;

/// Ticks between polarity flips (the demo's stand-in for pointer clicks)
const POLARITY_FLIP_INTERVAL: u32 = 150;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from_file(&path).unwrap_or_else(|err| {
            warn!("failed to load scene config {path}: {err}; using defaults");
            SceneConfig::default()
        }),
        None => SceneConfig::default(),
    };

    let mut world = World::new();
    let mut rng = rand::thread_rng();
    scene::seed_world(&mut world, &config, &mut rng);
    info!(
        "seeded {} entities across {} receptors",
        world.entity_count(),
        config.receptors.len()
    );

    let counters = subscribe_narration(&world);

    // Forces computed by the field system, consumed by the physics step
    let forces: Rc<RefCell<HashMap<Entity, Vector2<f64>>>> =
        Rc::new(RefCell::new(HashMap::new()));
    let force_sink = {
        let forces = Rc::clone(&forces);
        Box::new(move |entity: Entity, force: Vector2<f64>| {
            *forces.borrow_mut().entry(entity).or_insert_with(Vector2::zeros) += force;
        })
    };

    let cursor = Rc::new(RefCell::new(CursorField::new(
        config.field_width / 2.0,
        config.field_height / 2.0,
    )));

    // Reference system order: cursor field, gate rotation, locking, integration
    let integration = IntegrationSystem::new(world.event_bus());
    world.add_system(Box::new(CursorFieldSystem::new(
        Rc::clone(&cursor),
        force_sink,
    )));
    world.add_system(Box::new(GateRotationSystem::new()));
    world.add_system(Box::new(LockingSystem::new()));
    world.add_system(Box::new(integration));

    let mut velocities: HashMap<Entity, Vector2<f64>> = HashMap::new();
    let orbit_radius = config.field_height / 3.0;

    for tick in 0..config.ticks {
        move_cursor(&cursor, &config, orbit_radius, tick);
        world.update(config.tick_ms);
        step_ion_physics(&mut world, &config, &mut velocities, &forces);
    }

    report(&world, &counters, config.ticks);
}

/// Event counters, logged as they happen (the play scene's listener set)
struct EventCounters {
    locks: Rc<RefCell<u32>>,
    spikes: Rc<RefCell<u32>>,
    gate_opens: Rc<RefCell<u32>>,
}

fn subscribe_narration(world: &World) -> EventCounters {
    let counters = EventCounters {
        locks: Rc::new(RefCell::new(0)),
        spikes: Rc::new(RefCell::new(0)),
        gate_opens: Rc::new(RefCell::new(0)),
    };

    let locks = Rc::clone(&counters.locks);
    world.event_bus().on(EventKind::IonLocked, move |event| {
        if let GameEvent::IonLocked { ion, target, .. } = event {
            *locks.borrow_mut() += 1;
            info!("ion {} locked onto target {}", ion.id(), target.id());
        }
    });

    let spikes = Rc::clone(&counters.spikes);
    world.event_bus().on(EventKind::ActionPotential, move |event| {
        if let GameEvent::ActionPotential { entity, timestamp } = event {
            *spikes.borrow_mut() += 1;
            info!("action potential on entity {} at {timestamp:.0}ms", entity.id());
        }
    });

    let gate_opens = Rc::clone(&counters.gate_opens);
    world.event_bus().on(EventKind::GateOpened, move |event| {
        if let GameEvent::GateOpened { entity, .. } = event {
            *gate_opens.borrow_mut() += 1;
            info!("gate opened on entity {}", entity.id());
        }
    });

    counters
}

/// Orbit the cursor around the field center and flip polarity periodically
fn move_cursor(
    cursor: &Rc<RefCell<CursorField>>,
    config: &SceneConfig,
    orbit_radius: f64,
    tick: u32,
) {
    let elapsed_s = f64::from(tick) * config.tick_ms / 1000.0;
    let angle = CURSOR_ORBIT_SPEED * elapsed_s;

    let mut cursor = cursor.borrow_mut();
    cursor.position.x = config.field_width / 2.0 + orbit_radius * angle.cos();
    cursor.position.y = config.field_height / 2.0 + orbit_radius * angle.sin();
    if tick > 0 && tick % POLARITY_FLIP_INTERVAL == 0 {
        cursor.toggle_polarity();
    }
}

/// Integrate ion velocities and positions from the accumulated field forces
///
/// This is the demo's stand-in for the physics collaborator: it is the only
/// code that writes `Body` positions.
fn step_ion_physics(
    world: &mut World,
    config: &SceneConfig,
    velocities: &mut HashMap<Entity, Vector2<f64>>,
    forces: &Rc<RefCell<HashMap<Entity, Vector2<f64>>>>,
) {
    let dt_s = config.tick_ms / 1000.0;
    let mut forces = forces.borrow_mut();

    let ions = world.entities_with(&[ComponentKind::Ion, ComponentKind::Body]);
    velocities.retain(|entity, _| world.entity_exists(*entity));

    for entity in ions {
        let Some(ion) = world.get_component::<Ion>(entity).copied() else {
            continue;
        };

        let velocity = velocities.entry(entity).or_insert_with(Vector2::zeros);
        if let Some(force) = forces.remove(&entity) {
            *velocity += force * FORCE_GAIN / ion.mass * dt_s;
        }
        *velocity *= 1.0 - AIR_FRICTION;

        let step = *velocity * dt_s;
        let mut hit_x = false;
        let mut hit_y = false;
        if let Some(body) = world.get_component_mut::<Body>(entity) {
            body.position += step;
            // Keep ions on the field; kill the velocity component that hit
            if body.position.x < 0.0 || body.position.x > config.field_width {
                body.position.x = body.position.x.clamp(0.0, config.field_width);
                hit_x = true;
            }
            if body.position.y < 0.0 || body.position.y > config.field_height {
                body.position.y = body.position.y.clamp(0.0, config.field_height);
                hit_y = true;
            }
        }
        if hit_x || hit_y {
            if let Some(velocity) = velocities.get_mut(&entity) {
                if hit_x {
                    velocity.x = 0.0;
                }
                if hit_y {
                    velocity.y = 0.0;
                }
            }
        }
    }

    forces.clear();
}

/// Final run summary, including what the render passes would draw
fn report(world: &World, counters: &EventCounters, ticks: u32) {
    let drawn_mask = LayerMask::IONS | LayerMask::TARGETS;
    let mut ions_drawn = 0;
    let mut targets_drawn = 0;
    for renderable in world.store::<Renderable>().values() {
        if drawn_mask.contains(renderable.layer.mask()) {
            match renderable.layer {
                RenderLayer::Ions => ions_drawn += 1,
                RenderLayer::Targets => targets_drawn += 1,
                _ => {}
            }
        }
    }

    info!(
        "simulated {ticks} ticks ({:.1}s of synapse time)",
        world.now() / 1000.0
    );
    info!(
        "{} locks, {} action potentials, {} gate reopenings",
        counters.locks.borrow(),
        counters.spikes.borrow(),
        counters.gate_opens.borrow()
    );
    info!("{ions_drawn} ions and {targets_drawn} targets left on the field");
}
