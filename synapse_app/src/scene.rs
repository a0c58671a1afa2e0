//! Scene configuration and seeding
//!
//! Mirrors what the browser build's play scene sets up: receptors with open
//! gates and integrating membranes, plus a population of ions scattered
//! around them for the field and locking systems to work on.

use nalgebra::Point2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use synapse_engine::config::Config;
use synapse_engine::ecs::components::{
    Body, GateState, Ion, Potential, ReceptorKind, RenderLayer, Renderable, Target,
};
use synapse_engine::ecs::World;

/// Simulation scene parameters, loadable from TOML or RON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Field width in world units
    pub field_width: f64,
    /// Field height in world units
    pub field_height: f64,
    /// Tick length in milliseconds
    pub tick_ms: f64,
    /// Number of ticks to simulate
    pub ticks: u32,
    /// Ion population per species
    pub sodium_ions: u32,
    /// Ca2+ count
    pub calcium_ions: u32,
    /// Cl- count
    pub chloride_ions: u32,
    /// K+ count
    pub potassium_ions: u32,
    /// Receptor placements
    pub receptors: Vec<ReceptorConfig>,
}

/// One receptor in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptorConfig {
    /// Receptor family
    pub kind: ReceptorKind,
    /// Position x
    pub x: f64,
    /// Position y
    pub y: f64,
    /// Window rotation speed in radians per second
    pub gate_speed: f64,
    /// Acceptance window width in radians
    pub arc: f64,
    /// Post-lock cooldown in milliseconds
    pub cooldown_ms: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            field_width: 1024.0,
            field_height: 768.0,
            tick_ms: 16.0,
            ticks: 1800,
            sodium_ions: 12,
            calcium_ions: 6,
            chloride_ions: 6,
            potassium_ions: 8,
            receptors: vec![
                ReceptorConfig {
                    kind: ReceptorKind::Ampa,
                    x: 400.0,
                    y: 300.0,
                    gate_speed: std::f64::consts::FRAC_PI_2,
                    arc: std::f64::consts::FRAC_PI_3,
                    cooldown_ms: 2000.0,
                },
                ReceptorConfig {
                    kind: ReceptorKind::Nmda,
                    x: 640.0,
                    y: 420.0,
                    gate_speed: std::f64::consts::FRAC_PI_4,
                    arc: std::f64::consts::FRAC_PI_3,
                    cooldown_ms: 2500.0,
                },
                ReceptorConfig {
                    kind: ReceptorKind::GabaA,
                    x: 512.0,
                    y: 560.0,
                    gate_speed: std::f64::consts::FRAC_PI_3,
                    arc: std::f64::consts::FRAC_PI_4,
                    cooldown_ms: 1500.0,
                },
            ],
        }
    }
}

impl Config for SceneConfig {}

/// Populate a world from the scene config
///
/// Ions are scattered in a ring around a random receptor so the field and
/// locking systems have work to do from the first tick.
pub fn seed_world(world: &mut World, config: &SceneConfig, rng: &mut impl Rng) {
    for receptor in &config.receptors {
        let entity = world.create_entity();
        world.add_component(
            entity,
            Target::new(
                receptor.kind,
                receptor.gate_speed,
                receptor.arc,
                receptor.cooldown_ms,
            ),
        );
        world.add_component(entity, GateState::open());
        world.add_component(entity, Body::new(receptor.x, receptor.y));
        world.add_component(entity, Potential::resting(-70.0, -55.0));
        world.add_component(entity, Renderable::new(RenderLayer::Targets));
    }

    let species: [(Ion, u32); 4] = [
        (Ion::sodium(), config.sodium_ions),
        (Ion::calcium(), config.calcium_ions),
        (Ion::chloride(), config.chloride_ions),
        (Ion::potassium(), config.potassium_ions),
    ];

    for (ion, count) in species {
        for _ in 0..count {
            let anchor = if config.receptors.is_empty() {
                Point2::new(config.field_width / 2.0, config.field_height / 2.0)
            } else {
                let picked = &config.receptors[rng.gen_range(0..config.receptors.len())];
                Point2::new(picked.x, picked.y)
            };

            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = rng.gen_range(40.0..160.0);
            let x = (anchor.x + radius * angle.cos()).clamp(0.0, config.field_width);
            let y = (anchor.y + radius * angle.sin()).clamp(0.0, config.field_height);

            let entity = world.create_entity();
            world.add_component(entity, ion);
            world.add_component(entity, Body::new(x, y));
            world.add_component(entity, Renderable::new(RenderLayer::Ions));
        }
    }
}
