//! Headless battle runner.
//!
//! This binary runs a battle without graphics, controlled via JSON on
//! stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode with the built-in skirmish
//! cargo run -p tactics_headless
//!
//! # Interactive mode with a scenario file
//! cargo run -p tactics_headless -- run --scenario scenarios/skirmish.ron
//!
//! # Print the cheapest path between two cells
//! cargo run -p tactics_headless -- path --scenario scenarios/skirmish.ron --from 1,2 --to 7,6
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tactics_core::grid::GridCoord;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tactics_headless::{
    protocol::{parse_cell, Response},
    runner::HeadlessRunner,
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "tactics_headless")]
#[command(about = "Headless grid tactics runner for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session
    Run {
        /// Scenario file to load (built-in skirmish if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Print the cheapest path between two cells as a JSON line
    Path {
        /// Scenario file to load (built-in skirmish if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Start cell as X,Y
        #[arg(long, value_parser = parse_cell)]
        from: GridCoord,

        /// Destination cell as X,Y
        #[arg(long, value_parser = parse_cell)]
        to: GridCoord,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run { scenario }) => cmd_run(scenario),
        Some(Commands::Path { scenario, from, to }) => cmd_path(scenario, from, to),
        None => cmd_run(None),
    }
}

/// Load the scenario file, or the built-in skirmish.
fn load_scenario(path: Option<PathBuf>) -> Scenario {
    let Some(path) = path else {
        return Scenario::skirmish();
    };

    match Scenario::load(&path) {
        Ok(scenario) => {
            tracing::info!("Loaded scenario '{}' from {}", scenario.name, path.display());
            scenario
        }
        Err(e) => {
            eprintln!("Failed to load scenario: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run an interactive session on stdin/stdout
fn cmd_run(scenario: Option<PathBuf>) {
    tracing::info!("Starting interactive session");

    let scenario = load_scenario(scenario);
    let mut runner = match HeadlessRunner::from_scenario(&scenario) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to build scenario: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = runner.run(stdin.lock(), stdout.lock()) {
        eprintln!("I/O error: {}", e);
        std::process::exit(1);
    }
}

/// Print one path query
fn cmd_path(scenario: Option<PathBuf>, from: GridCoord, to: GridCoord) {
    let scenario = load_scenario(scenario);
    let battle = match scenario.build() {
        Ok(battle) => battle,
        Err(e) => {
            eprintln!("Failed to build scenario: {}", e);
            std::process::exit(1);
        }
    };

    let path = battle.path_between(from, to);
    tracing::info!(%from, %to, valid = path.is_valid(), cost = path.cost(), "Path query");
    print!("{}", Response::Path { path }.to_json_line());
}
