//! Incremental pushover analysis of a reinforced-concrete shell roof
//!
//! This crate builds a solver-ready shell-and-frame model from a handful of
//! geometric and material constants, ramps a uniform pressure in fixed
//! increments, gates each step on the external equilibrium solver's
//! convergence status and exports per-step displacement tables.
//!
//! The equilibrium solve itself (element stiffness, constitutive
//! integration, Newton iteration, the linear solve) is an external
//! collaborator behind [`engine::AnalysisEngine`]. This crate owns model
//! construction, the ramp policy and the result pipeline.
//!
//! ## Example
//! ```no_run
//! use shell_pushover::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mode = MaterialModel::Nonlinear;
//! let builder = ModelBuilder::new(mode);
//! let mut exporter = ResultExporter::create("results", mode, 61)?;
//! let engine = OpenSeesEngine::from_env();
//! let outcome = PushoverDriver::new(engine, builder, 61).run(&mut exporter)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod elements;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod loads;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::driver::{PushoverDriver, RampSchedule, RunOutcome};
    pub use crate::elements::{
        Element, Fiber, FiberSection, LayeredShell, Material, Node, Section, ShellLayer,
        SofteningLaw, Support,
    };
    pub use crate::engine::{
        AnalysisEngine, EngineError, OpenSeesEngine, SolveRecipe, StepOutcome,
    };
    pub use crate::error::{GeometryError, PushoverError, PushoverResult};
    pub use crate::export::ResultExporter;
    pub use crate::geometry::{StructuredGrid, SurfacePatch};
    pub use crate::loads::{pressure_loads, LoadPattern, NodeLoad, TimeSeries};
    pub use crate::model::{MaterialModel, Model, ModelBuilder};
    pub use crate::results::{NodeDisplacement, Solution};
}
