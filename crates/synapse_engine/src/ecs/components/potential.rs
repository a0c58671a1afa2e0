//! Membrane potential component

/// Per-entity membrane integrator state, in millivolts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Potential {
    /// Current membrane potential
    pub vm: f64,
    /// Resting potential the membrane relaxes toward
    pub vrest: f64,
    /// Spike threshold
    pub threshold: f64,
}

impl Potential {
    /// A membrane starting at its resting potential
    pub const fn resting(vrest: f64, threshold: f64) -> Self {
        Self {
            vm: vrest,
            vrest,
            threshold,
        }
    }
}
