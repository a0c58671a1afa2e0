//! Ion component for mobile charged particles

/// Ion species relevant to synaptic signaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonKind {
    /// Sodium
    Na,
    /// Calcium
    Ca,
    /// Chloride
    Cl,
    /// Potassium
    K,
}

/// A mobile charged particle
///
/// Charge drives both the cursor-field force and the synaptic strength of a
/// successful lock; mass only matters to the external physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ion {
    /// Species of this ion
    pub kind: IonKind,
    /// Elementary charge (negative for anions)
    pub charge: f64,
    /// Atomic mass
    pub mass: f64,
}

impl Ion {
    /// Create an ion with explicit charge and mass
    pub const fn new(kind: IonKind, charge: f64, mass: f64) -> Self {
        Self { kind, charge, mass }
    }

    /// Na+, the workhorse of excitatory signaling
    pub const fn sodium() -> Self {
        Self::new(IonKind::Na, 1.0, 23.0)
    }

    /// Ca2+
    pub const fn calcium() -> Self {
        Self::new(IonKind::Ca, 2.0, 40.0)
    }

    /// Cl-
    pub const fn chloride() -> Self {
        Self::new(IonKind::Cl, -1.0, 35.0)
    }

    /// K+
    pub const fn potassium() -> Self {
        Self::new(IonKind::K, 1.0, 39.0)
    }
}
