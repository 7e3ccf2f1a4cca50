//! Error types for model construction and the result pipeline

use thiserror::Error;

use crate::engine::EngineError;

/// Main error type for pushover runs
#[derive(Error, Debug)]
pub enum PushoverError {
    #[error("node {0} not found in model")]
    NodeNotFound(usize),

    #[error("material {0} not found in model")]
    MaterialNotFound(usize),

    #[error("section {0} not found in model")]
    SectionNotFound(usize),

    #[error("node {0} already defined")]
    DuplicateNode(usize),

    #[error("element {0} already defined")]
    DuplicateElement(usize),

    #[error("material tag {0} already defined")]
    DuplicateMaterial(usize),

    #[error("section tag {0} already defined")]
    DuplicateSection(usize),

    #[error("softening law tables have mismatched lengths ({strain}/{stress}/{damage})")]
    LawTableMismatch {
        strain: usize,
        stress: usize,
        damage: usize,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Geometry or boundary construction could not satisfy a request
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("surface mesh needs at least one subdivision per direction (got {nx}x{ny})")]
    DegenerateGrid { nx: usize, ny: usize },

    #[error("no nodes on elevation plane z = {z}")]
    UnmatchedPlane { z: f64 },

    #[error("no nodes within tolerance {tol} of ({x}, {y}, {z})")]
    NoNodesMatched { x: f64, y: f64, z: f64, tol: f64 },
}

/// Result type for pushover operations
pub type PushoverResult<T> = Result<T, PushoverError>;
