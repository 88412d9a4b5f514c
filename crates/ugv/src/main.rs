use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing();
    let config = cli::load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Waypoint(args) => args.run(&config),
        Command::Drive(args) => args.run(&config),
        Command::Console(args) => args.run(&config),
    }
}

#[derive(Parser)]
#[command(name = "ugv", about = "Drive a simulated ground vehicle to saved waypoints")]
struct Cli {
    /// Path to the configuration file (TOML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage saved waypoints.
    Waypoint(cli::waypoint::WaypointArgs),
    /// Start the engine and drive to a waypoint in real time.
    Drive(cli::drive::DriveArgs),
    /// Interactive operator console.
    Console(cli::console::ConsoleArgs),
}
