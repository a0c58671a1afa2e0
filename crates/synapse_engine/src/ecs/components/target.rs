//! Receptor target and gate state components

use serde::{Deserialize, Serialize};

use super::ion::IonKind;

/// Receptor/channel families the simulation models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptorKind {
    /// AMPA receptor - fast excitatory, sodium and potassium
    Ampa,
    /// NMDA receptor - slow excitatory, sodium and calcium
    Nmda,
    /// GABA-A receptor - inhibitory, chloride
    GabaA,
    /// Voltage-gated calcium channel
    Vgcc,
}

impl ReceptorKind {
    /// Whether this receptor accepts the given ion species
    pub const fn accepts(self, ion: IonKind) -> bool {
        match self {
            Self::Ampa => matches!(ion, IonKind::Na | IonKind::K),
            Self::Nmda => matches!(ion, IonKind::Na | IonKind::Ca),
            Self::GabaA => matches!(ion, IonKind::Cl),
            Self::Vgcc => matches!(ion, IonKind::Ca),
        }
    }

    /// Multiplier applied to the synaptic strength of a lock
    pub const fn strength_multiplier(self) -> f64 {
        match self {
            Self::Ampa => 1.0,
            Self::Nmda => 1.5,
            Self::GabaA => 0.8,
            Self::Vgcc => 2.0,
        }
    }

    /// Excitatory receptors produce EPSPs, inhibitory ones IPSPs
    pub const fn is_excitatory(self) -> bool {
        matches!(self, Self::Ampa | Self::Nmda | Self::Vgcc)
    }
}

/// A receptor with a rotating angular acceptance window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Receptor family
    pub kind: ReceptorKind,
    /// Window rotation speed in radians per second
    pub gate_speed: f64,
    /// Width of the acceptance window in radians
    pub arc: f64,
    /// Current window center in radians, kept in [0, 2pi)
    pub open_angle: f64,
    /// Cooldown after a lock before the gate reopens, in milliseconds
    pub cooldown_ms: f64,
}

impl Target {
    /// Create a receptor with its window centered at angle zero
    pub const fn new(kind: ReceptorKind, gate_speed: f64, arc: f64, cooldown_ms: f64) -> Self {
        Self {
            kind,
            gate_speed,
            arc,
            open_angle: 0.0,
            cooldown_ms,
        }
    }
}

/// Open/closed status of a receptor gate
///
/// Owned by the gate-rotation system; the locking system only flips
/// `is_open` to false and stamps `last_lock_at` on a successful lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateState {
    /// Whether the gate currently accepts ions
    pub is_open: bool,
    /// Simulation time of the last successful lock, in milliseconds
    pub last_lock_at: f64,
}

impl GateState {
    /// A gate that starts open and has never locked
    pub const fn open() -> Self {
        Self {
            is_open: true,
            last_lock_at: 0.0,
        }
    }

    /// A gate closed by a lock at the given time
    pub const fn closed_at(last_lock_at: f64) -> Self {
        Self {
            is_open: false,
            last_lock_at,
        }
    }
}
