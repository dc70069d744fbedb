//! Host-side CLI for simulating the camera-slider motion core, grounded on
//! the workspace's `klipper-host` binary: a `clap` derive CLI exposing rail
//! and profile parameters as flags instead of a parsed config file, since a
//! single-axis slider has no `printer.cfg` equivalent to load.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use slider_motion::{MoveMode, Profile, RailConfig};
use slider_sim::{scenarios, sim};
use tracing::info;

/// Simulates the camera-slider motion core without real hardware.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Rail length, in cm.
    #[arg(long, default_value_t = 150.0, global = true)]
    rail_length_cm: f32,

    /// Belt travel per motor revolution, in cm.
    #[arg(long, default_value_t = 2.0, global = true)]
    cm_per_rev: f32,

    /// Full steps per motor revolution before microstepping.
    #[arg(long, default_value_t = 200.0, global = true)]
    steps_per_rev: f32,

    /// Microstepping multiplier applied to `steps_per_rev`.
    #[arg(long, default_value_t = 8.0, global = true)]
    microsteps: f32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single move to completion and print its trace.
    Move(MoveArgs),
    /// Run one of the built-in regression scenarios (S1-S6 from the motion
    /// core's scenario table).
    Scenario(ScenarioArgs),
}

#[derive(Parser, Debug)]
struct MoveArgs {
    /// Target position, in microsteps.
    target: i32,

    /// Interpret `target` as relative to the current position.
    #[arg(long)]
    relative: bool,

    /// Acceleration profile.
    #[arg(long, value_enum, default_value_t = ProfileArg::Linear)]
    profile: ProfileArg,

    /// Dump the captured trace as JSON to stdout.
    #[arg(long)]
    dump_trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Linear,
    Quadratic,
}

impl From<ProfileArg> for Profile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Linear => Profile::Linear,
            ProfileArg::Quadratic => Profile::Quadratic,
        }
    }
}

#[derive(Parser, Debug)]
struct ScenarioArgs {
    /// Scenario name: s1, s2, s3, s4, s5, s6, or home.
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let max_count = RailConfig::max_count_from_rail(
        cli.rail_length_cm,
        cli.steps_per_rev * cli.microsteps,
        cli.cm_per_rev,
    );
    let cfg = RailConfig::eighth_step_default(max_count);
    info!(max_count, "rail configured");

    match cli.command {
        Commands::Move(args) => run_move(cfg, args),
        Commands::Scenario(args) => run_scenario(&args.name),
    }
}

fn run_move(cfg: RailConfig, args: MoveArgs) -> Result<()> {
    let mut h = sim::SimHarness::new(cfg);
    h.controller.set_profile(args.profile.into())?;
    let mode = if args.relative { MoveMode::Rel } else { MoveMode::Abs };
    h.controller.move_to(args.target, mode, true)?;
    h.run_to_halt(1_000_000)?;
    info!(final_pos = h.controller.current_position(), "move complete");

    if args.dump_trace {
        println!("{}", serde_json::to_string_pretty(&h.trace)?);
    }
    Ok(())
}

fn run_scenario(name: &str) -> Result<()> {
    match name {
        "s1" => {
            scenarios::s1_linear_accelerate_cruise_decelerate()?;
        }
        "s2" => scenarios::s2_same_direction_retarget()?,
        "s3" => scenarios::s3_reversal_queues_then_drains()?,
        "s4" => {
            scenarios::s4_speed_ramp_then_reversal()?;
        }
        "s5" => scenarios::s5_speed_mode_limit_guard()?,
        "s6" => scenarios::s6_configuration_rejected_while_moving()?,
        "home" => scenarios::blocking_move_aborts_on_limit_trip()?,
        other => anyhow::bail!("unknown scenario: {other}"),
    }
    info!(scenario = name, "scenario passed");
    Ok(())
}
