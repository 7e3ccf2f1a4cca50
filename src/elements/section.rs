//! Shell and frame cross-sections

use serde::{Deserialize, Serialize};

use super::MaterialTag;

/// One layer of a layered shell section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellLayer {
    pub material: MaterialTag,
    pub thickness: f64,
}

/// A through-thickness stack of material layers. The stack is fixed at
/// construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredShell {
    layers: Vec<ShellLayer>,
}

impl LayeredShell {
    pub fn new(layers: Vec<ShellLayer>) -> Self {
        Self { layers }
    }

    /// Layers from one face to the other, in stacking order
    pub fn layers(&self) -> &[ShellLayer] {
        &self.layers
    }

    /// Total section thickness
    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}

/// A single fiber of a fiber section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    pub material: MaterialTag,
    /// Local y coordinate of the fiber centroid
    pub y: f64,
    /// Local z coordinate of the fiber centroid
    pub z: f64,
    pub area: f64,
}

/// A fiber cross-section for frame elements: a torsional stiffness plus a
/// patch of sub-fibers integrated over the section plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberSection {
    gj: f64,
    fibers: Vec<Fiber>,
}

impl FiberSection {
    /// Create an empty section with the given torsional stiffness
    pub fn new(gj: f64) -> Self {
        Self {
            gj,
            fibers: Vec::new(),
        }
    }

    /// Subdivide the rectangle spanned by `(y1, z1)` and `(y2, z2)` into an
    /// `ny` x `nz` grid of equal-area fibers of the given material.
    pub fn with_rect_patch(
        mut self,
        material: MaterialTag,
        ny: usize,
        nz: usize,
        (y1, z1): (f64, f64),
        (y2, z2): (f64, f64),
    ) -> Self {
        let dy = (y2 - y1) / ny as f64;
        let dz = (z2 - z1) / nz as f64;
        let area = (dy * dz).abs();
        for j in 0..nz {
            let z = z1 + (j as f64 + 0.5) * dz;
            for i in 0..ny {
                let y = y1 + (i as f64 + 0.5) * dy;
                self.fibers.push(Fiber {
                    material,
                    y,
                    z,
                    area,
                });
            }
        }
        self
    }

    pub fn gj(&self) -> f64 {
        self.gj
    }

    pub fn fibers(&self) -> &[Fiber] {
        &self.fibers
    }

    /// Total fiber area
    pub fn area(&self) -> f64 {
        self.fibers.iter().map(|f| f.area).sum()
    }
}

/// Section behavior attached to elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Section {
    LayeredShell(LayeredShell),
    Fiber(FiberSection),
}

impl Section {
    /// Material tags referenced by this section
    pub fn material_tags(&self) -> Vec<MaterialTag> {
        match self {
            Section::LayeredShell(shell) => shell.layers().iter().map(|l| l.material).collect(),
            Section::Fiber(fiber) => fiber.fibers().iter().map(|f| f.material).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn layered_shell_total_thickness() {
        let shell = LayeredShell::new(vec![
            ShellLayer {
                material: 1,
                thickness: 1.25,
            },
            ShellLayer {
                material: 3,
                thickness: 1.0,
            },
            ShellLayer {
                material: 1,
                thickness: 1.5,
            },
        ]);
        assert_relative_eq!(shell.total_thickness(), 3.75);
        assert_eq!(shell.layers().len(), 3);
    }

    #[test]
    fn rect_patch_subdivides_into_equal_fibers() {
        let section = FiberSection::new(1.0).with_rect_patch(6, 10, 10, (-0.5, -0.5), (0.5, 0.5));
        assert_eq!(section.fibers().len(), 100);
        assert_relative_eq!(section.area(), 1.0, epsilon = 1e-12);
        // fibers are centered inside their cells
        let first = section.fibers()[0];
        assert_relative_eq!(first.y, -0.45);
        assert_relative_eq!(first.z, -0.45);
        assert_relative_eq!(first.area, 0.01);
    }
}
