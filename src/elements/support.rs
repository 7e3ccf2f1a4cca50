//! Support conditions

use serde::{Deserialize, Serialize};

/// Restraint state of the six DOF at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Support {
    /// Create a fully fixed support (all six DOF restrained)
    pub fn fixed() -> Self {
        Self {
            dx: true,
            dy: true,
            dz: true,
            rx: true,
            ry: true,
            rz: true,
        }
    }

    /// Create a support with specific restraints
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Restraint flags as [DX, DY, DZ, RX, RY, RZ]
    pub fn as_flags(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Indices (0-5) of the restrained DOF
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.as_flags()
            .into_iter()
            .enumerate()
            .filter(|(_, fixed)| *fixed)
            .map(|(dof, _)| dof)
            .collect()
    }

    /// Count of restrained DOF
    pub fn num_restrained(&self) -> usize {
        self.as_flags().into_iter().filter(|f| *f).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_support_restrains_all_six_dof() {
        let support = Support::fixed();
        assert_eq!(support.num_restrained(), 6);
        assert_eq!(support.restrained_dofs(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn partial_restraints() {
        let support = Support::with_restraints(true, true, true, false, false, false);
        assert_eq!(support.num_restrained(), 3);
        assert!(!support.rx);
    }
}
