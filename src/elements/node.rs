//! Node - a point in 3D space with six degrees of freedom

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::NodeId;

/// A node in the finite element model. Restraints live in the model's
/// support table, not on the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Solver-assigned identifier
    pub id: NodeId,
    /// Position in model coordinates
    pub position: Point3<f64>,
}

impl Node {
    /// Create a node at the given coordinates
    pub fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            position: Point3::new(x, y, z),
        }
    }

    /// Create a node at a point
    pub fn at(id: NodeId, position: Point3<f64>) -> Self {
        Self { id, position }
    }

    /// True when every coordinate lies within `tol` of the corresponding
    /// coordinate of `target`. Per-axis absolute comparison, not a radius.
    pub fn within(&self, target: &Point3<f64>, tol: f64) -> bool {
        (self.position.x - target.x).abs() <= tol
            && (self.position.y - target.y).abs() <= tol
            && (self.position.z - target.z).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_uses_per_axis_tolerance() {
        let node = Node::new(1, 1.0, 0.0, 1.0);
        // inside the box but outside the sphere of the same radius
        let target = Point3::new(0.91, 0.09, 0.91);
        assert!(node.within(&target, 0.1));
        assert!(!node.within(&Point3::new(0.8, 0.0, 1.0), 0.1));
    }
}
