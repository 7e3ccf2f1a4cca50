//! CSV result pipeline: coordinates once, a snapshot per accepted step,
//! and an append-only history for the tracked node

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::elements::NodeId;
use crate::error::PushoverResult;
use crate::model::{MaterialModel, Model};
use crate::results::{NodeDisplacement, Solution};

/// Writes the result tables for one run. There is exactly one writer; the
/// history file is opened at construction and grows by one row per
/// accepted step.
pub struct ResultExporter {
    dir: PathBuf,
    mode: MaterialModel,
    history: BufWriter<File>,
}

impl ResultExporter {
    /// Create the output directory and start the history file for
    /// `tracked_node` (header only; rows follow per accepted step)
    pub fn create(
        dir: impl Into<PathBuf>,
        mode: MaterialModel,
        tracked_node: NodeId,
    ) -> PushoverResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!(
            "node_{}_disp_history_{}.csv",
            tracked_node,
            mode.suffix()
        ));
        let mut history = BufWriter::new(File::create(&path)?);
        writeln!(history, "Iteration,p,ux,uy,uz")?;
        history.flush()?;
        info!("started {}", path.display());
        Ok(Self { dir, mode, history })
    }

    /// Static node coordinate table, written once before the ramp
    pub fn write_coordinates(&self, model: &Model) -> PushoverResult<()> {
        let path = self.dir.join("node_coordinates.csv");
        let mut file = BufWriter::new(File::create(&path)?);
        writeln!(file, "Node,x,y,z")?;
        for node in model.nodes() {
            writeln!(
                file,
                "{},{},{},{}",
                node.id, node.position.x, node.position.y, node.position.z
            )?;
        }
        file.flush()?;
        info!("wrote {}", path.display());
        Ok(())
    }

    /// Full displacement table for one accepted step
    pub fn write_step_snapshot(
        &self,
        model: &Model,
        solution: &Solution,
        step: usize,
    ) -> PushoverResult<()> {
        let path = self
            .dir
            .join(format!("node_displacements_{}_{}.csv", step, self.mode.suffix()));
        let mut file = BufWriter::new(File::create(&path)?);
        writeln!(file, "Node,ux,uy,uz")?;
        for node in model.nodes() {
            let d = solution.displacement(node.id)?;
            writeln!(file, "{},{},{},{}", node.id, d.dx, d.dy, d.dz)?;
        }
        file.flush()?;
        info!("wrote {}", path.display());
        Ok(())
    }

    /// Append the tracked node's displacement for one accepted step. Rows
    /// are flushed immediately so an interrupted run keeps what it earned.
    pub fn append_history(
        &mut self,
        step: usize,
        pressure: f64,
        displacement: NodeDisplacement,
    ) -> PushoverResult<()> {
        writeln!(
            self.history,
            "{},{:.3},{},{},{}",
            step, pressure, displacement.dx, displacement.dy, displacement.dz
        )?;
        self.history.flush()?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
