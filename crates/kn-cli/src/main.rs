//! CLI frontend for the Kennel simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kennel",
    about = "Kennel: dogs collecting loot on a road network",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, kn_simulation=trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a game config and list its maps
    Check {
        /// Game config file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Run a headless simulation with bot players
    Simulate {
        /// Game config file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Number of bot players to join, spread over the maps
        #[arg(short, long, default_value = "4")]
        bots: usize,

        /// Number of ticks to run
        #[arg(short, long, default_value = "200")]
        ticks: u64,

        /// Tick length in milliseconds
        #[arg(long, default_value = "50")]
        tick_period: u64,

        /// RNG seed for spawning, tokens and bot behaviour
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Spawn dogs at random road points instead of the first road's start
        #[arg(long)]
        randomize_spawn_points: bool,

        /// Resume from and save to this state file
        #[arg(long)]
        state_file: Option<PathBuf>,

        /// Save the state every this many milliseconds of game time
        #[arg(long, requires = "state_file")]
        save_state_period: Option<u64>,

        /// Also dump the final state of every session as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Check { config } => commands::check::run(&config),
        Commands::Simulate {
            config,
            bots,
            ticks,
            tick_period,
            seed,
            randomize_spawn_points,
            state_file,
            save_state_period,
            json,
        } => commands::simulate::run(&commands::simulate::Options {
            config,
            bots,
            ticks,
            tick_period,
            seed,
            randomize_spawn_points,
            state_file,
            save_state_period,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
