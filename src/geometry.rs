//! Structured surface meshing over four corner points

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::error::GeometryError;

/// A ruled quadrilateral surface spanned by four corner points in cyclic
/// order. Corner 1 sits at parametric (0, 0), corner 2 at (1, 0), corner 3
/// at (1, 1) and corner 4 at (0, 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePatch {
    corners: [Point3<f64>; 4],
}

impl SurfacePatch {
    /// Create a patch from four corner points in cyclic order
    pub fn new(corners: [Point3<f64>; 4]) -> Self {
        Self { corners }
    }

    /// Bilinear interpolation of the corner points at parametric (u, v).
    /// At the parametric extremes this reproduces the corner points exactly.
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        let [p1, p2, p3, p4] = &self.corners;
        Point3::from(
            p1.coords * ((1.0 - u) * (1.0 - v))
                + p2.coords * (u * (1.0 - v))
                + p3.coords * (u * v)
                + p4.coords * ((1.0 - u) * v),
        )
    }

    /// Mesh the patch into an `nx` x `ny` structured grid of quads.
    ///
    /// Node ids are assigned sequentially from `first_id`, row-major with
    /// `i` running along the corner 1 → 2 edge and `j` along corner 1 → 4.
    pub fn mesh(
        &self,
        nx: usize,
        ny: usize,
        first_id: NodeId,
    ) -> Result<StructuredGrid, GeometryError> {
        if nx == 0 || ny == 0 {
            return Err(GeometryError::DegenerateGrid { nx, ny });
        }

        let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            let v = j as f64 / ny as f64;
            for i in 0..=nx {
                let u = i as f64 / nx as f64;
                let id = first_id + j * (nx + 1) + i;
                nodes.push((id, self.point_at(u, v)));
            }
        }

        let grid = StructuredGrid {
            nx,
            ny,
            first_id,
            nodes,
            quads: Vec::new(),
        };

        let mut quads = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                // CCW connectivity: (i,j) (i+1,j) (i+1,j+1) (i,j+1)
                quads.push([
                    grid.node_id(i, j),
                    grid.node_id(i + 1, j),
                    grid.node_id(i + 1, j + 1),
                    grid.node_id(i, j + 1),
                ]);
            }
        }

        Ok(StructuredGrid { quads, ..grid })
    }
}

/// A realized structured grid: node positions plus quad connectivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredGrid {
    nx: usize,
    ny: usize,
    first_id: NodeId,
    nodes: Vec<(NodeId, Point3<f64>)>,
    quads: Vec<[NodeId; 4]>,
}

impl StructuredGrid {
    /// All grid nodes as (id, position), in id order
    pub fn nodes(&self) -> &[(NodeId, Point3<f64>)] {
        &self.nodes
    }

    /// Quad connectivity, row-major
    pub fn quads(&self) -> &[[NodeId; 4]] {
        &self.quads
    }

    fn node_id(&self, i: usize, j: usize) -> NodeId {
        self.first_id + j * (self.nx + 1) + i
    }

    /// Perimeter node ids as one closed counter-clockwise cycle starting at
    /// the first corner. Consecutive pairs (wrapping at the end) describe
    /// the edge members that frame the mesh boundary.
    pub fn edge_walk(&self) -> Vec<NodeId> {
        let mut walk = Vec::with_capacity(2 * (self.nx + self.ny));
        for i in 0..self.nx {
            walk.push(self.node_id(i, 0));
        }
        for j in 0..self.ny {
            walk.push(self.node_id(self.nx, j));
        }
        for i in (1..=self.nx).rev() {
            walk.push(self.node_id(i, self.ny));
        }
        for j in (1..=self.ny).rev() {
            walk.push(self.node_id(0, j));
        }
        walk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn saddle() -> SurfacePatch {
        SurfacePatch::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-399.384, 0.0, 599.076),
            Point3::new(0.0, 0.0, 865.332),
            Point3::new(399.384, 0.0, 264.924),
        ])
    }

    #[test]
    fn corner_nodes_reproduce_corner_points_exactly() {
        let grid = saddle().mesh(10, 10, 1).unwrap();
        // grid ids of the four parametric corners, in patch corner order
        let expected = [
            (1, Point3::new(0.0, 0.0, 0.0)),
            (11, Point3::new(-399.384, 0.0, 599.076)),
            (121, Point3::new(0.0, 0.0, 865.332)),
            (111, Point3::new(399.384, 0.0, 264.924)),
        ];
        for (id, corner) in expected {
            let (node_id, position) = grid.nodes()[id - 1];
            assert_eq!(node_id, id);
            assert_eq!(position, corner);
            assert_relative_eq!(position.z, corner.z, epsilon = f64::EPSILON);
        }
    }

    #[test]
    fn grid_counts_match_resolution() {
        let grid = saddle().mesh(10, 10, 1).unwrap();
        assert_eq!(grid.nodes().len(), 121);
        assert_eq!(grid.quads().len(), 100);
        assert_eq!(grid.quads()[0], [1, 2, 13, 12]);
        assert_eq!(grid.quads()[99], [109, 110, 121, 120]);
    }

    #[test]
    fn edge_walk_is_a_closed_perimeter_cycle() {
        let grid = saddle().mesh(10, 10, 1).unwrap();
        let walk = grid.edge_walk();
        assert_eq!(walk.len(), 40);
        assert_eq!(walk[0], 1);
        assert_eq!(walk[10], 11); // corner 2
        assert_eq!(walk[20], 121); // corner 3
        assert_eq!(walk[30], 111); // corner 4
        // no repeats; the cycle closes by wrapping, not by duplicating
        let mut seen = walk.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), walk.len());
    }

    #[test]
    fn zero_subdivisions_is_a_geometry_error() {
        let err = saddle().mesh(0, 10, 1).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateGrid { nx: 0, ny: 10 }));
    }
}
