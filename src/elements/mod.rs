//! Model building blocks: nodes, supports, materials, sections, elements

pub mod element;
pub mod material;
pub mod node;
pub mod section;
pub mod support;

pub use element::Element;
pub use material::{Material, SofteningLaw};
pub use node::Node;
pub use section::{Fiber, FiberSection, LayeredShell, Section, ShellLayer};
pub use support::Support;

/// Solver-assigned node identifier, unique within a model
pub type NodeId = usize;
/// Element identifier
pub type ElementId = usize;
/// Material tag; referenced by sections, never duplicated within a model
pub type MaterialTag = usize;
/// Section tag; referenced by elements
pub type SectionTag = usize;
