//! Pressure ramp driver: rebuild, solve, export, repeat

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::engine::{AnalysisEngine, EngineError, SolveRecipe, StepOutcome};
use crate::error::{PushoverError, PushoverResult};
use crate::export::ResultExporter;
use crate::loads::pressure_loads;
use crate::model::ModelBuilder;

/// The monotone pressure ramp walked by the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampSchedule {
    /// Pressure at the first step
    pub start: f64,
    /// Pressure increment per step
    pub increment: f64,
    /// Largest pressure that will still be executed
    pub limit: f64,
}

impl Default for RampSchedule {
    fn default() -> Self {
        Self {
            start: 0.0,
            increment: 0.45,
            limit: 5.0,
        }
    }
}

impl RampSchedule {
    /// Pressure evaluated at 1-based `step`
    pub fn pressure_at(&self, step: usize) -> f64 {
        self.start + (step - 1) as f64 * self.increment
    }

    /// Whether `step` is still inside the ramp
    pub fn contains(&self, step: usize) -> bool {
        self.pressure_at(step) <= self.limit
    }
}

/// How a run ended. Divergence and engine faults are reported states, not
/// errors; files exported by earlier steps stay intact in every case.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every step up to the ramp limit converged
    RampCompleted { steps: usize },
    /// The engine returned a non-converged status; the ramp stops there
    Diverged {
        step: usize,
        pressure: f64,
        status: i32,
    },
    /// The engine itself failed; nothing from the failed step is exported
    EngineFault {
        step: usize,
        pressure: f64,
        fault: EngineError,
    },
}

/// Drives the incremental pushover. Every step builds a fresh model and
/// re-solves the full cumulative pressure from the undeformed state; the
/// step index and pressure are threaded explicitly, never held in shared
/// mutable state.
pub struct PushoverDriver<E> {
    engine: E,
    builder: ModelBuilder,
    schedule: RampSchedule,
    recipe: SolveRecipe,
    tracked_node: NodeId,
}

impl<E: AnalysisEngine> PushoverDriver<E> {
    pub fn new(engine: E, builder: ModelBuilder, tracked_node: NodeId) -> Self {
        Self {
            engine,
            builder,
            schedule: RampSchedule::default(),
            recipe: SolveRecipe::default(),
            tracked_node,
        }
    }

    pub fn with_schedule(mut self, schedule: RampSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_recipe(mut self, recipe: SolveRecipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Run the ramp to completion, divergence or fault.
    ///
    /// Writes the static coordinate table before the first step and
    /// validates the tracked node against the model's node set, so a bad
    /// tracking id fails here rather than at the first export.
    pub fn run(&mut self, exporter: &mut ResultExporter) -> PushoverResult<RunOutcome> {
        let probe = self.builder.build()?;
        if !probe.contains_node(self.tracked_node) {
            return Err(PushoverError::NodeNotFound(self.tracked_node));
        }
        exporter.write_coordinates(&probe)?;
        info!(
            "tracking node {}; ramp {} to {} by {}",
            self.tracked_node, self.schedule.start, self.schedule.limit, self.schedule.increment
        );

        let mut step = 1;
        loop {
            if !self.schedule.contains(step) {
                let steps = step - 1;
                info!("ramp limit {} reached after {steps} step(s)", self.schedule.limit);
                return Ok(RunOutcome::RampCompleted { steps });
            }
            let pressure = self.schedule.pressure_at(step);

            let model = self.builder.build()?;
            let pattern = pressure_loads(&model, pressure);

            match self.engine.analyze_static(&model, &pattern, &self.recipe) {
                Err(fault) => {
                    error!("engine fault at step {step}, p = {pressure:.3}: {fault}");
                    return Ok(RunOutcome::EngineFault {
                        step,
                        pressure,
                        fault,
                    });
                }
                Ok(StepOutcome::Diverged(status)) => {
                    warn!("failed to converge at step {step}, p = {pressure:.3} (status {status})");
                    return Ok(RunOutcome::Diverged {
                        step,
                        pressure,
                        status,
                    });
                }
                Ok(StepOutcome::Converged(solution)) => {
                    let tracked = solution.displacement(self.tracked_node)?;
                    exporter.write_step_snapshot(&model, &solution, step)?;
                    exporter.append_history(step, pressure, tracked)?;
                    info!(
                        "step {step} converged at p = {pressure:.3}; max |u| = {:.4}",
                        solution.max_translation()
                    );
                    step += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ramp_evaluates_twelve_pressures() {
        let ramp = RampSchedule::default();
        let pressures: Vec<f64> = (1..)
            .take_while(|&s| ramp.contains(s))
            .map(|s| ramp.pressure_at(s))
            .collect();
        assert_eq!(pressures.len(), 12);
        assert_eq!(pressures[0], 0.0);
        assert_eq!(pressures[1], 0.45);
        assert!((pressures[11] - 4.95).abs() < 1e-12);
        assert!(pressures.iter().all(|&p| p <= 5.0));
        // the step that would overshoot the limit is never evaluated
        assert!(!ramp.contains(13));
        assert!(ramp.pressure_at(13) > 5.0);
    }

    #[test]
    fn ramp_pressures_are_strictly_increasing() {
        let ramp = RampSchedule::default();
        for step in 1..12 {
            assert!(ramp.pressure_at(step + 1) > ramp.pressure_at(step));
        }
    }
}
