//! Material definitions for the shell stack and the edge frame

use serde::{Deserialize, Serialize};

use super::MaterialTag;
use crate::error::PushoverError;

/// A tabulated stress-strain-damage law for one loading sense of the
/// damage-plasticity concrete. The three tables are parallel: entry `i`
/// pairs a total strain with the stress carried at that strain and the
/// accumulated stiffness damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofteningLaw {
    strain: Vec<f64>,
    stress: Vec<f64>,
    damage: Vec<f64>,
}

impl SofteningLaw {
    /// Build a law from parallel tables; lengths must agree.
    pub fn new(
        strain: Vec<f64>,
        stress: Vec<f64>,
        damage: Vec<f64>,
    ) -> Result<Self, PushoverError> {
        if strain.len() != stress.len() || strain.len() != damage.len() {
            return Err(PushoverError::LawTableMismatch {
                strain: strain.len(),
                stress: stress.len(),
                damage: damage.len(),
            });
        }
        Ok(Self {
            strain,
            stress,
            damage,
        })
    }

    pub fn strain(&self) -> &[f64] {
        &self.strain
    }

    pub fn stress(&self) -> &[f64] {
        &self.stress
    }

    pub fn damage(&self) -> &[f64] {
        &self.damage
    }

    /// Number of table points
    pub fn len(&self) -> usize {
        self.strain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strain.is_empty()
    }
}

/// Material behavior variants. One definition per tag; sections reference
/// tags, never copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Linear elastic isotropic continuum
    ElasticIsotropic { e: f64, nu: f64 },

    /// Linear elastic uniaxial
    Elastic { e: f64 },

    /// Damage-plasticity concrete continuum with tabulated tension and
    /// compression softening
    DamageConcrete {
        e: f64,
        nu: f64,
        tension: SofteningLaw,
        compression: SofteningLaw,
        /// Characteristic length used to regularize the laws against mesh size
        regularization: f64,
    },

    /// Bilinear uniaxial steel with kinematic hardening
    Steel { fy: f64, e: f64, hardening: f64 },

    /// Uniaxial concrete with distinct peak and crushing points
    Concrete {
        fpc: f64,
        epsc0: f64,
        fpcu: f64,
        epsu: f64,
    },

    /// Smeared rebar layer: a uniaxial steel acting at a fixed in-plane angle
    RebarLayer { steel: MaterialTag, angle_deg: f64 },
}
