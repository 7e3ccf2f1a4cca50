//! Load pattern and nodal pressure distribution

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::model::Model;

/// Scale-factor time series applied to a load pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSeries {
    /// Monotonic 0 → 1 linear ramp
    Linear,
}

/// Forces and moments applied at a single node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl NodeLoad {
    /// Create a load with all six components
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self {
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
        }
    }

    /// Create a force-only load
    pub fn force(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a load in Y only
    pub fn fy(value: f64) -> Self {
        Self::force(0.0, value, 0.0)
    }

    /// Components as [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }
}

/// One load pattern: a ramp series scaling a set of nodal loads. A node may
/// carry several contributions; they accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPattern {
    series: TimeSeries,
    loads: BTreeMap<NodeId, Vec<NodeLoad>>,
}

impl LoadPattern {
    pub fn new(series: TimeSeries) -> Self {
        Self {
            series,
            loads: BTreeMap::new(),
        }
    }

    pub fn series(&self) -> TimeSeries {
        self.series
    }

    /// Append one contribution at `node`
    pub fn add(&mut self, node: NodeId, load: NodeLoad) {
        self.loads.entry(node).or_default().push(load);
    }

    /// Every contribution, flattened, in node-id order
    pub fn loads(&self) -> impl Iterator<Item = (NodeId, &NodeLoad)> + '_ {
        self.loads
            .iter()
            .flat_map(|(id, loads)| loads.iter().map(move |l| (*id, l)))
    }

    /// Number of contributions at `node`
    pub fn contributions(&self, node: NodeId) -> usize {
        self.loads.get(&node).map_or(0, Vec::len)
    }

    /// Summed components at `node`
    pub fn resultant(&self, node: NodeId) -> [f64; 6] {
        let mut total = [0.0; 6];
        if let Some(loads) = self.loads.get(&node) {
            for load in loads {
                for (slot, component) in total.iter_mut().zip(load.as_array()) {
                    *slot += component;
                }
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

/// Distribute a pressure magnitude as nodal forces in -Y.
///
/// Every element contributes one load of magnitude `pressure` to each node
/// it references, so a node shared by several elements accumulates one
/// contribution per adjacent element. Adjacency-count weighting, not
/// tributary area.
pub fn pressure_loads(model: &Model, pressure: f64) -> LoadPattern {
    let mut pattern = LoadPattern::new(TimeSeries::Linear);
    for (_, element) in model.elements() {
        for &node in element.nodes() {
            pattern.add(node, NodeLoad::fy(-pressure));
        }
    }
    pattern
}
