mod config;
mod input;
mod render;

use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use controller::{
    CommandSource, ControllerConfig, Driver, OperatorCommand, PumpController, Scripted,
};
use log::info;

use crate::input::LineSource;
use crate::render::TraceRow;

#[derive(Clone, Debug, ValueEnum)]
enum Preset {
    /// Primary pump loop, dual-band trips, fault injection
    Pump,
    /// Single-tier SCRAM monitor, random walk
    Monitor,
}

#[derive(Clone, Debug, ValueEnum)]
enum Format {
    Jsonl,
    Status,
}

#[derive(Parser, Debug)]
#[command(
    name = "pump-scram-sim",
    version,
    about = "Reactor pump control state machine with SCRAM (simulation)"
)]
struct Args {
    #[arg(value_enum, long, default_value = "pump")]
    preset: Preset,

    /// JSON config file; fields it leaves out keep the preset's values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Operator commands, one per tick, comma separated (unknown entries are no command)
    #[arg(long, value_delimiter = ',', default_value = "start")]
    commands: Vec<String>,

    /// Read operator commands from stdin, one line per tick ("quit" exits)
    #[arg(long, conflicts_with = "commands")]
    interactive: bool,

    /// Maximum number of ticks, 0 for no limit
    #[arg(long, default_value_t = 60)]
    ticks: u64,

    /// Delay between ticks in milliseconds
    #[arg(long, default_value_t = 0)]
    dt_ms: u64,

    /// RNG seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    #[arg(value_enum, long, default_value = "jsonl")]
    format: Format,

    /// End the run as soon as SCRAM is entered
    #[arg(long)]
    stop_on_scram: bool,

    /// Log transitions and violations to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let preset = match args.preset {
        Preset::Pump => ControllerConfig::pump(),
        Preset::Monitor => ControllerConfig::monitor(),
    };
    let cfg = match &args.config {
        Some(path) => config::load(preset, path)?,
        None => preset,
    };

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let controller = PumpController::seeded(&cfg, args.seed)?;

    if args.interactive {
        let stdin = io::stdin();
        run(&args, controller, LineSource::new(stdin.lock(), true))
    } else {
        let commands = args.commands.iter().map(|c| OperatorCommand::normalize(c));
        run(&args, controller, Scripted::new(commands))
    }
}

fn run<S: CommandSource>(args: &Args, controller: PumpController, source: S) -> Result<()> {
    let thresholds = *controller.thresholds();
    let mut driver = Driver::new(controller, source).stop_on_scram(args.stop_on_scram);
    if args.ticks > 0 {
        driver = driver.max_ticks(args.ticks);
    }

    let pace = Duration::from_millis(args.dt_ms);
    let mut failure = None;

    let summary = driver.run(|report| {
        let line = match args.format {
            Format::Jsonl => serde_json::to_string(&TraceRow::from(report)),
            Format::Status => Ok(render::status(report, &thresholds)),
        };
        match line {
            Ok(line) => println!("{line}"),
            Err(e) => {
                failure = Some(e);
                return ControlFlow::Break(());
            }
        }
        if !pace.is_zero() {
            thread::sleep(pace);
        }
        ControlFlow::Continue(())
    });

    if let Some(e) = failure {
        return Err(e.into());
    }

    info!(
        "{} ticks, final state {}, {} scram(s), stopped: {:?}",
        summary.ticks, summary.final_state, summary.scrams, summary.stop
    );
    if matches!(args.format, Format::Status) {
        println!(
            "simulation ended after {} ticks in state [{}]",
            summary.ticks, summary.final_state
        );
    }
    Ok(())
}
