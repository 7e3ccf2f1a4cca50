//! Analysis engine contract and the fixed numerical recipe
//!
//! The equilibrium solve itself lives outside this crate. Anything that can
//! run one static step against a fully defined model satisfies
//! [`AnalysisEngine`]; the shipped implementation bridges to an external
//! OpenSees interpreter process.

pub mod opensees;

pub use opensees::OpenSeesEngine;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loads::LoadPattern;
use crate::model::Model;
use crate::results::Solution;

/// Iterative solution algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Newton,
    ModifiedNewton,
}

/// Equation numbering scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Numberer {
    Rcm,
    Plain,
}

/// Constraint handling scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintHandler {
    Plain,
    Transformation,
}

/// Linear system solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearSystem {
    SparseGeneral { pivoting: bool },
    BandGeneral,
}

/// The numerical recipe for one static step: load-control integration with
/// a displacement-increment convergence test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveRecipe {
    /// Load factor increment per analysis step
    pub load_increment: f64,
    /// Iterations the integrator holds the increment for
    pub increment_iterations: usize,
    /// Lower bound on the load factor increment
    pub min_increment: f64,
    /// Upper bound on the load factor increment
    pub max_increment: f64,
    /// Displacement-increment norm tolerance
    pub tolerance: f64,
    /// Iteration budget for the convergence test
    pub max_iterations: usize,
    /// Engine-side diagnostic print level
    pub print_flag: u8,
    pub algorithm: Algorithm,
    pub numberer: Numberer,
    pub constraints: ConstraintHandler,
    pub system: LinearSystem,
}

impl Default for SolveRecipe {
    fn default() -> Self {
        Self {
            load_increment: 1.0,
            increment_iterations: 1,
            min_increment: 1.0,
            max_increment: 10.0,
            tolerance: 1.0e-2,
            max_iterations: 30,
            print_flag: 2,
            algorithm: Algorithm::Newton,
            numberer: Numberer::Rcm,
            constraints: ConstraintHandler::Plain,
            system: LinearSystem::SparseGeneral { pivoting: true },
        }
    }
}

/// Outcome of one static analysis step
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The equilibrium iteration converged; displacements are available
    Converged(Solution),
    /// The engine ran but did not converge within the iteration budget;
    /// carries the engine's status code
    Diverged(i32),
}

/// Faults raised by the engine itself, as opposed to a clean
/// failure-to-converge status
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch solver process: {0}")]
    Launch(#[source] std::io::Error),

    #[error("solver process failed: {0}")]
    Process(String),

    #[error("unreadable solver output: {0}")]
    OutputParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One static nonlinear solve against a fully defined model.
///
/// The call is blocking and non-cancelable; a hang in the engine hangs the
/// caller. Faults are returned as [`EngineError`], never retried here.
pub trait AnalysisEngine {
    fn analyze_static(
        &mut self,
        model: &Model,
        pattern: &LoadPattern,
        recipe: &SolveRecipe,
    ) -> Result<StepOutcome, EngineError>;
}
