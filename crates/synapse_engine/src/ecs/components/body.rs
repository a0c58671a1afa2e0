//! Physics body component

use nalgebra::Point2;

/// Positional data supplied by the external physics collaborator
///
/// The simulation only reads positions; the physics layer owns movement and
/// writes them back between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Current position in world units
    pub position: Point2<f64>,
}

impl Body {
    /// Create a body at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    /// Create a body at a point
    pub const fn at(position: Point2<f64>) -> Self {
        Self { position }
    }
}
