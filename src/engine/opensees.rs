//! Subprocess bridge to an external OpenSees interpreter
//!
//! Each solve renders the model, load pattern and numerical recipe into a
//! Tcl script inside a temporary working directory, runs the interpreter
//! there, reads the analyze status off stdout and parses the node
//! displacement recorder file into a [`Solution`].

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::debug;
use tempfile::TempDir;

use crate::elements::{Element, Material, Section};
use crate::loads::{LoadPattern, TimeSeries};
use crate::model::Model;
use crate::results::{NodeDisplacement, Solution};

use super::{
    Algorithm, AnalysisEngine, ConstraintHandler, EngineError, LinearSystem, Numberer, SolveRecipe,
    StepOutcome,
};

const SCRIPT_NAME: &str = "step.tcl";
const DISP_FILE: &str = "displacements.out";
const STATUS_PREFIX: &str = "ANALYZE-STATUS";

/// Bridge to an `OpenSees` interpreter binary
pub struct OpenSeesEngine {
    command: PathBuf,
}

impl OpenSeesEngine {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the interpreter from `OPENSEES_PATH`, falling back to
    /// `OpenSees` on the search path
    pub fn from_env() -> Self {
        let command = std::env::var("OPENSEES_PATH").unwrap_or_else(|_| "OpenSees".to_string());
        Self::new(command)
    }

    pub fn command(&self) -> &PathBuf {
        &self.command
    }
}

impl AnalysisEngine for OpenSeesEngine {
    fn analyze_static(
        &mut self,
        model: &Model,
        pattern: &LoadPattern,
        recipe: &SolveRecipe,
    ) -> Result<StepOutcome, EngineError> {
        let workdir = TempDir::new()?;
        let script_path = workdir.path().join(SCRIPT_NAME);
        fs::write(&script_path, render_script(model, pattern, recipe))?;

        debug!(
            "running {} {} in {}",
            self.command.display(),
            SCRIPT_NAME,
            workdir.path().display()
        );
        let output = Command::new(&self.command)
            .arg(SCRIPT_NAME)
            .current_dir(workdir.path())
            .output()
            .map_err(EngineError::Launch)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Process(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let status = parse_status(&stdout)?;
        if status != 0 {
            return Ok(StepOutcome::Diverged(status));
        }

        let raw = fs::read_to_string(workdir.path().join(DISP_FILE))?;
        let solution = parse_displacements(&raw, model)?;
        Ok(StepOutcome::Converged(solution))
    }
}

/// Render the full per-step input deck. Definition order follows the build
/// order: materials, sections, nodes, elements, supports, then the load
/// pattern and the numerical recipe.
fn render_script(model: &Model, pattern: &LoadPattern, recipe: &SolveRecipe) -> String {
    let mut tcl = String::new();
    tcl.push_str("wipe\n");
    tcl.push_str("model BasicBuilder -ndm 3 -ndf 6\n");

    for (tag, material) in model.materials() {
        match material {
            Material::ElasticIsotropic { e, nu } => {
                tcl.push_str(&format!("nDMaterial ElasticIsotropic {tag} {e} {nu}\n"));
            }
            Material::Elastic { e } => {
                tcl.push_str(&format!("uniaxialMaterial Elastic {tag} {e}\n"));
            }
            Material::DamageConcrete {
                e,
                nu,
                tension,
                compression,
                regularization,
            } => {
                tcl.push_str(&format!("nDMaterial ASDConcrete3D {tag} {e} {nu} \\\n"));
                tcl.push_str(&format!("    -Te {} \\\n", join(tension.strain())));
                tcl.push_str(&format!("    -Ts {} \\\n", join(tension.stress())));
                tcl.push_str(&format!("    -Td {} \\\n", join(tension.damage())));
                tcl.push_str(&format!("    -Ce {} \\\n", join(compression.strain())));
                tcl.push_str(&format!("    -Cs {} \\\n", join(compression.stress())));
                tcl.push_str(&format!("    -Cd {} \\\n", join(compression.damage())));
                tcl.push_str(&format!("    -autoRegularization {regularization}\n"));
            }
            Material::Steel { fy, e, hardening } => {
                tcl.push_str(&format!("uniaxialMaterial Steel01 {tag} {fy} {e} {hardening}\n"));
            }
            Material::Concrete {
                fpc,
                epsc0,
                fpcu,
                epsu,
            } => {
                tcl.push_str(&format!(
                    "uniaxialMaterial Concrete01 {tag} {fpc} {epsc0} {fpcu} {epsu}\n"
                ));
            }
            Material::RebarLayer { steel, angle_deg } => {
                tcl.push_str(&format!("nDMaterial PlateRebar {tag} {steel} {angle_deg}\n"));
            }
        }
    }

    for (tag, section) in model.sections() {
        match section {
            Section::LayeredShell(shell) => {
                tcl.push_str(&format!("section LayeredShell {tag} {}", shell.layers().len()));
                for layer in shell.layers() {
                    tcl.push_str(&format!(" {} {}", layer.material, layer.thickness));
                }
                tcl.push('\n');
            }
            Section::Fiber(fiber) => {
                tcl.push_str(&format!("section Fiber {tag} -GJ {} {{\n", fiber.gj()));
                for f in fiber.fibers() {
                    tcl.push_str(&format!("    fiber {} {} {} {}\n", f.y, f.z, f.area, f.material));
                }
                tcl.push_str("}\n");
            }
        }
    }

    for node in model.nodes() {
        tcl.push_str(&format!(
            "node {} {} {} {}\n",
            node.id, node.position.x, node.position.y, node.position.z
        ));
    }

    // one geometric transform per distinct frame orientation
    let mut verticals: Vec<[f64; 3]> = Vec::new();
    for (_, element) in model.elements() {
        if let Element::Frame { vertical, .. } = element {
            if !verticals.contains(vertical) {
                verticals.push(*vertical);
            }
        }
    }
    for (idx, v) in verticals.iter().enumerate() {
        tcl.push_str(&format!(
            "geomTransf Linear {} {} {} {}\n",
            idx + 1,
            v[0],
            v[1],
            v[2]
        ));
    }

    for (id, element) in model.elements() {
        match element {
            Element::Shell { nodes, section } => {
                tcl.push_str(&format!(
                    "element ShellMITC4 {id} {} {} {} {} {section}\n",
                    nodes[0], nodes[1], nodes[2], nodes[3]
                ));
            }
            Element::Frame {
                nodes,
                section,
                vertical,
            } => {
                let transf = verticals.iter().position(|v| v == vertical).unwrap_or(0) + 1;
                tcl.push_str(&format!(
                    "element forceBeamColumn {id} {} {} {transf} Lobatto {section} 5\n",
                    nodes[0], nodes[1]
                ));
            }
        }
    }

    for (node, support) in model.supports() {
        tcl.push_str(&format!("fix {node}"));
        for flag in support.as_flags() {
            tcl.push_str(if flag { " 1" } else { " 0" });
        }
        tcl.push('\n');
    }

    match pattern.series() {
        TimeSeries::Linear => tcl.push_str("timeSeries Linear 1\n"),
    }
    tcl.push_str("pattern Plain 1 1 {\n");
    for (node, load) in pattern.loads() {
        tcl.push_str(&format!(
            "    load {node} {} {} {} {} {} {}\n",
            load.fx, load.fy, load.fz, load.mx, load.my, load.mz
        ));
    }
    tcl.push_str("}\n");

    let (first, last) = (
        model.node_ids().next().unwrap_or(0),
        model.node_ids().last().unwrap_or(0),
    );
    tcl.push_str(&format!(
        "recorder Node -file {DISP_FILE} -nodeRange {first} {last} -dof 1 2 3 4 5 6 disp\n"
    ));

    match recipe.constraints {
        ConstraintHandler::Plain => tcl.push_str("constraints Plain\n"),
        ConstraintHandler::Transformation => tcl.push_str("constraints Transformation\n"),
    }
    match recipe.numberer {
        Numberer::Rcm => tcl.push_str("numberer RCM\n"),
        Numberer::Plain => tcl.push_str("numberer Plain\n"),
    }
    match recipe.system {
        LinearSystem::SparseGeneral { pivoting: true } => {
            tcl.push_str("system SparseGeneral -piv\n")
        }
        LinearSystem::SparseGeneral { pivoting: false } => tcl.push_str("system SparseGeneral\n"),
        LinearSystem::BandGeneral => tcl.push_str("system BandGeneral\n"),
    }
    tcl.push_str(&format!(
        "test NormDispIncr {} {} {}\n",
        recipe.tolerance, recipe.max_iterations, recipe.print_flag
    ));
    match recipe.algorithm {
        Algorithm::Newton => tcl.push_str("algorithm Newton\n"),
        Algorithm::ModifiedNewton => tcl.push_str("algorithm ModifiedNewton\n"),
    }
    tcl.push_str(&format!(
        "integrator LoadControl {} {} {} {}\n",
        recipe.load_increment, recipe.increment_iterations, recipe.min_increment,
        recipe.max_increment
    ));
    tcl.push_str("analysis Static\n");
    tcl.push_str("set status [analyze 1]\n");
    tcl.push_str(&format!("puts \"{STATUS_PREFIX} $status\"\n"));
    // closing the model flushes the recorder file
    tcl.push_str("wipe\n");
    tcl
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull the analyze return status off the interpreter's stdout
fn parse_status(stdout: &str) -> Result<i32, EngineError> {
    for line in stdout.lines() {
        if let Some(rest) = line.trim().strip_prefix(STATUS_PREFIX) {
            return rest.trim().parse::<i32>().map_err(|e| {
                EngineError::OutputParse(format!("bad status line {line:?}: {e}"))
            });
        }
    }
    Err(EngineError::OutputParse(format!(
        "no {STATUS_PREFIX} line in solver output"
    )))
}

/// Parse the node recorder output: one line per recorded step holding six
/// values per node, in node-id order. The last line is the converged state.
fn parse_displacements(raw: &str, model: &Model) -> Result<Solution, EngineError> {
    let line = raw
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| EngineError::OutputParse("empty displacement recorder file".into()))?;

    let values: Vec<f64> = line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|e| EngineError::OutputParse(format!("bad displacement value: {e}")))?;

    let expected = model.node_count() * 6;
    if values.len() != expected {
        return Err(EngineError::OutputParse(format!(
            "expected {expected} displacement values, found {}",
            values.len()
        )));
    }

    let mut solution = Solution::new();
    for (node, chunk) in model.node_ids().zip(values.chunks_exact(6)) {
        let mut components = [0.0; 6];
        components.copy_from_slice(chunk);
        solution.insert(node, NodeDisplacement::from_array(components));
    }
    Ok(solution)
}
