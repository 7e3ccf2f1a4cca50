//! Pushover CLI: ramps a uniform pressure on the shell roof model and
//! exports a displacement table per converged step

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use shell_pushover::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "pushover",
    version,
    about = "Incremental pressure-ramp analysis of the shell roof model"
)]
struct Cli {
    /// Node id whose displacement history is recorded
    #[arg(long)]
    track_node: usize,

    /// Output directory for the CSV tables
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Pressure at the first step
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Pressure increment per step
    #[arg(long, default_value_t = 0.45)]
    increment: f64,

    /// Largest pressure that will still be executed
    #[arg(long, default_value_t = 5.0)]
    limit: f64,

    /// Use elastic materials instead of the damage-plasticity set
    #[arg(long)]
    linear: bool,

    /// Skip the perimeter frame members
    #[arg(long)]
    no_edge_frame: bool,

    /// OpenSees interpreter to invoke (overrides OPENSEES_PATH)
    #[arg(long)]
    engine_cmd: Option<PathBuf>,

    /// Write the solver-ready model as JSON before running
    #[arg(long)]
    dump_model: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mode = if cli.linear {
        MaterialModel::Linear
    } else {
        MaterialModel::Nonlinear
    };
    let builder = ModelBuilder::new(mode).frame_edges(!cli.no_edge_frame);

    if let Some(path) = &cli.dump_model {
        let model = builder.build()?;
        let json = serde_json::to_string_pretty(&model)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("model dumped to {}", path.display());
    }

    let engine = match &cli.engine_cmd {
        Some(cmd) => OpenSeesEngine::new(cmd),
        None => OpenSeesEngine::from_env(),
    };

    let schedule = RampSchedule {
        start: cli.start,
        increment: cli.increment,
        limit: cli.limit,
    };

    let mut exporter = ResultExporter::create(&cli.out_dir, mode, cli.track_node)
        .with_context(|| format!("preparing output directory {}", cli.out_dir.display()))?;

    let outcome = PushoverDriver::new(engine, builder, cli.track_node)
        .with_schedule(schedule)
        .run(&mut exporter)?;

    // analysis outcomes are reported, not turned into exit codes
    match outcome {
        RunOutcome::RampCompleted { steps } => {
            println!("ramp complete: {steps} converged step(s)");
        }
        RunOutcome::Diverged {
            step,
            pressure,
            status,
        } => {
            println!("stopped: no convergence at step {step}, p = {pressure:.3} (status {status})");
        }
        RunOutcome::EngineFault {
            step,
            pressure,
            fault,
        } => {
            println!("stopped: engine fault at step {step}, p = {pressure:.3}: {fault}");
        }
    }
    Ok(())
}
