//! Spline edge component for signal-propagation paths

use nalgebra::Point2;

/// Polyline a propagating signal travels along, drawn by the lines layer
#[derive(Debug, Clone, PartialEq)]
pub struct SplineEdge {
    /// Control points in world units, in travel order
    pub points: Vec<Point2<f64>>,
}

impl SplineEdge {
    /// Create an edge from its control points
    pub const fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    /// Total polyline length in world units
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_sums_segments() {
        let edge = SplineEdge::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 10.0),
        ]);
        assert_eq!(edge.length(), 11.0);
    }

    #[test]
    fn test_degenerate_edges_have_zero_length() {
        assert_eq!(SplineEdge::new(Vec::new()).length(), 0.0);
        assert_eq!(SplineEdge::new(vec![Point2::new(1.0, 1.0)]).length(), 0.0);
    }
}
