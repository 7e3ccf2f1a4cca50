//! End-to-end ramp behavior against a scripted engine stand-in

use std::fs;
use std::path::Path;

use shell_pushover::prelude::*;

/// Engine stand-in with one scripted outcome per call
struct ScriptedEngine {
    calls: usize,
    diverge_at: Option<usize>,
    fault_at: Option<usize>,
}

impl ScriptedEngine {
    fn converging() -> Self {
        Self {
            calls: 0,
            diverge_at: None,
            fault_at: None,
        }
    }

    fn diverging_at(call: usize) -> Self {
        Self {
            diverge_at: Some(call),
            ..Self::converging()
        }
    }

    fn faulting_at(call: usize) -> Self {
        Self {
            fault_at: Some(call),
            ..Self::converging()
        }
    }
}

impl AnalysisEngine for ScriptedEngine {
    fn analyze_static(
        &mut self,
        model: &Model,
        _pattern: &LoadPattern,
        _recipe: &SolveRecipe,
    ) -> Result<StepOutcome, EngineError> {
        self.calls += 1;
        if self.fault_at == Some(self.calls) {
            return Err(EngineError::Process("scripted fault".into()));
        }
        if self.diverge_at == Some(self.calls) {
            return Ok(StepOutcome::Diverged(-3));
        }
        let mut solution = Solution::new();
        for id in model.node_ids() {
            solution.insert(
                id,
                NodeDisplacement {
                    dy: -0.01 * self.calls as f64,
                    ..Default::default()
                },
            );
        }
        Ok(StepOutcome::Converged(solution))
    }
}

fn snapshot_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("node_displacements_")
        })
        .count()
}

fn history_rows(dir: &Path, tracked: usize, mode: MaterialModel) -> Vec<String> {
    let path = dir.join(format!(
        "node_{}_disp_history_{}.csv",
        tracked,
        mode.suffix()
    ));
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[test]
fn full_ramp_writes_twelve_snapshots_and_history_rows() {
    let out = tempfile::tempdir().unwrap();
    let mode = MaterialModel::Nonlinear;
    let builder = ModelBuilder::new(mode);
    let mut exporter = ResultExporter::create(out.path(), mode, 61).unwrap();

    let outcome = PushoverDriver::new(ScriptedEngine::converging(), builder, 61)
        .run(&mut exporter)
        .unwrap();
    assert!(matches!(outcome, RunOutcome::RampCompleted { steps: 12 }));

    assert!(out.path().join("node_coordinates.csv").exists());
    assert_eq!(snapshot_count(out.path()), 12);
    for step in 1..=12 {
        assert!(out
            .path()
            .join(format!("node_displacements_{step}_nonlinear.csv"))
            .exists());
    }
    assert!(!out
        .path()
        .join("node_displacements_13_nonlinear.csv")
        .exists());

    let rows = history_rows(out.path(), 61, mode);
    assert_eq!(rows.len(), 12);
    let mut last_step = 0usize;
    let mut last_pressure = -1.0f64;
    for row in &rows {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 5);
        let step: usize = fields[0].parse().unwrap();
        let pressure: f64 = fields[1].parse().unwrap();
        assert!(step > last_step);
        assert!(pressure > last_pressure);
        assert!(pressure <= 5.0);
        last_step = step;
        last_pressure = pressure;
    }
    assert!(rows[0].starts_with("1,0.000,"));
    assert!(rows[11].starts_with("12,4.950,"));
}

#[test]
fn divergence_stops_the_ramp_after_two_accepted_steps() {
    let out = tempfile::tempdir().unwrap();
    let mode = MaterialModel::Nonlinear;
    let builder = ModelBuilder::new(mode);
    let mut exporter = ResultExporter::create(out.path(), mode, 61).unwrap();

    let outcome = PushoverDriver::new(ScriptedEngine::diverging_at(3), builder, 61)
        .run(&mut exporter)
        .unwrap();
    match outcome {
        RunOutcome::Diverged {
            step,
            pressure,
            status,
        } => {
            assert_eq!(step, 3);
            assert!((pressure - 0.90).abs() < 1e-12);
            assert_eq!(status, -3);
        }
        other => panic!("expected divergence, got {other:?}"),
    }

    assert_eq!(snapshot_count(out.path()), 2);
    assert_eq!(history_rows(out.path(), 61, mode).len(), 2);
}

#[test]
fn engine_fault_on_first_step_exports_nothing_but_coordinates() {
    let out = tempfile::tempdir().unwrap();
    let mode = MaterialModel::Nonlinear;
    let builder = ModelBuilder::new(mode);
    let mut exporter = ResultExporter::create(out.path(), mode, 61).unwrap();

    let outcome = PushoverDriver::new(ScriptedEngine::faulting_at(1), builder, 61)
        .run(&mut exporter)
        .unwrap();
    match outcome {
        RunOutcome::EngineFault { step, fault, .. } => {
            assert_eq!(step, 1);
            assert!(matches!(fault, EngineError::Process(_)));
        }
        other => panic!("expected an engine fault, got {other:?}"),
    }

    assert!(out.path().join("node_coordinates.csv").exists());
    assert_eq!(snapshot_count(out.path()), 0);
    assert!(history_rows(out.path(), 61, mode).is_empty());
}

#[test]
fn unknown_tracked_node_fails_before_the_loop() {
    let out = tempfile::tempdir().unwrap();
    let mode = MaterialModel::Linear;
    let builder = ModelBuilder::new(mode);
    let mut exporter = ResultExporter::create(out.path(), mode, 9999).unwrap();

    let err = PushoverDriver::new(ScriptedEngine::converging(), builder, 9999)
        .run(&mut exporter)
        .unwrap_err();
    assert!(matches!(err, PushoverError::NodeNotFound(9999)));
    assert_eq!(snapshot_count(out.path()), 0);
}

#[test]
fn linear_mode_names_files_with_the_linear_suffix() {
    let out = tempfile::tempdir().unwrap();
    let mode = MaterialModel::Linear;
    let builder = ModelBuilder::new(mode);
    let mut exporter = ResultExporter::create(out.path(), mode, 1).unwrap();

    let outcome = PushoverDriver::new(ScriptedEngine::diverging_at(2), builder, 1)
        .run(&mut exporter)
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Diverged { step: 2, .. }));

    assert!(out.path().join("node_displacements_1_linear.csv").exists());
    assert!(out.path().join("node_1_disp_history_linear.csv").exists());
}
