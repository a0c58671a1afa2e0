//! Renderable layer tag component

use bitflags::bitflags;

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    /// Spline edges and connective lines
    Lines,
    /// Ion particles
    Ions,
    /// Receptor targets and their gates
    Targets,
    /// Transient effects (sparks, uptake flashes)
    Fx,
}

bitflags! {
    /// Set of render layers, for the rendering collaborator's pass filters
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerMask: u32 {
        /// [`RenderLayer::Lines`]
        const LINES = 1 << 0;
        /// [`RenderLayer::Ions`]
        const IONS = 1 << 1;
        /// [`RenderLayer::Targets`]
        const TARGETS = 1 << 2;
        /// [`RenderLayer::Fx`]
        const FX = 1 << 3;
    }
}

impl RenderLayer {
    /// The single-layer mask for this layer
    pub const fn mask(self) -> LayerMask {
        match self {
            Self::Lines => LayerMask::LINES,
            Self::Ions => LayerMask::IONS,
            Self::Targets => LayerMask::TARGETS,
            Self::Fx => LayerMask::FX,
        }
    }
}

/// Marks an entity as drawable on one layer
///
/// The core never draws; the rendering collaborator reads this tag to decide
/// what goes in which pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    /// Layer this entity is drawn on
    pub layer: RenderLayer,
}

impl Renderable {
    /// Tag an entity for one layer
    pub const fn new(layer: RenderLayer) -> Self {
        Self { layer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_masks_are_disjoint() {
        let layers = [
            RenderLayer::Lines,
            RenderLayer::Ions,
            RenderLayer::Targets,
            RenderLayer::Fx,
        ];

        for (i, a) in layers.iter().enumerate() {
            for (j, b) in layers.iter().enumerate() {
                if i != j {
                    assert!((a.mask() & b.mask()).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_mask_filtering() {
        let pass = LayerMask::IONS | LayerMask::FX;
        assert!(pass.contains(RenderLayer::Ions.mask()));
        assert!(!pass.contains(RenderLayer::Targets.mask()));
    }
}
