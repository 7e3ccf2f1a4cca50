//! Elements: shell quads and perimeter frame members

use serde::{Deserialize, Serialize};

use super::{NodeId, SectionTag};

/// A finite element referencing previously defined nodes and a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// Four-node quadrilateral shell (MITC4 formulation engine-side)
    Shell {
        nodes: [NodeId; 4],
        section: SectionTag,
    },

    /// Two-node frame member along the mesh perimeter. `vertical` orients
    /// the local axes.
    Frame {
        nodes: [NodeId; 2],
        section: SectionTag,
        vertical: [f64; 3],
    },
}

impl Element {
    /// Node ids referenced by this element, in connectivity order
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Element::Shell { nodes, .. } => nodes,
            Element::Frame { nodes, .. } => nodes,
        }
    }

    /// Section tag this element integrates over
    pub fn section(&self) -> SectionTag {
        match self {
            Element::Shell { section, .. } => *section,
            Element::Frame { section, .. } => *section,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_order_is_preserved() {
        let shell = Element::Shell {
            nodes: [1, 2, 13, 12],
            section: 1,
        };
        assert_eq!(shell.nodes(), &[1, 2, 13, 12]);
        assert_eq!(shell.section(), 1);

        let frame = Element::Frame {
            nodes: [11, 12],
            section: 5,
            vertical: [0.0, 0.0, 1.0],
        };
        assert_eq!(frame.nodes(), &[11, 12]);
    }
}
