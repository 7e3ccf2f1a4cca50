//! Post-solve result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::error::{PushoverError, PushoverResult};

/// Displacement components at one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X
    pub dx: f64,
    /// Displacement in Y
    pub dy: f64,
    /// Displacement in Z
    pub dz: f64,
    /// Rotation about X
    pub rx: f64,
    /// Rotation about Y
    pub ry: f64,
    /// Rotation about Z
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// Per-node displacements from one converged static step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    displacements: BTreeMap<NodeId, NodeDisplacement>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, displacement: NodeDisplacement) {
        self.displacements.insert(node, displacement);
    }

    /// Displacement at `node`; unknown ids are an error, not a default
    pub fn displacement(&self, node: NodeId) -> PushoverResult<NodeDisplacement> {
        self.displacements
            .get(&node)
            .copied()
            .ok_or(PushoverError::NodeNotFound(node))
    }

    /// All entries in node-id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeDisplacement)> + '_ {
        self.displacements.iter().map(|(id, d)| (*id, *d))
    }

    pub fn len(&self) -> usize {
        self.displacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }

    /// Largest translation magnitude over all nodes
    pub fn max_translation(&self) -> f64 {
        self.displacements
            .values()
            .map(NodeDisplacement::translation_magnitude)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_lookup_is_an_error() {
        let mut solution = Solution::new();
        solution.insert(1, NodeDisplacement::from_array([0.1, -0.2, 0.0, 0.0, 0.0, 0.0]));
        assert!(solution.displacement(1).is_ok());
        assert!(matches!(
            solution.displacement(99),
            Err(PushoverError::NodeNotFound(99))
        ));
    }

    #[test]
    fn max_translation_scans_all_nodes() {
        let mut solution = Solution::new();
        solution.insert(1, NodeDisplacement::from_array([3.0, 4.0, 0.0, 0.0, 0.0, 0.0]));
        solution.insert(2, NodeDisplacement::default());
        assert_eq!(solution.max_translation(), 5.0);
    }
}
