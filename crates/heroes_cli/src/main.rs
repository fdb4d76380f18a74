//! Operator CLI for the heroes store.
//!
//! # Responsibility
//! - Verify `heroes_core` linkage (`ping`, `version`).
//! - Reset a store to the sample roster (`seed`).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use heroes_core::db::open_from_uri;
use heroes_core::seed::seed_sample_data;
use heroes_core::{default_log_level, init_logging};
use log::error;

#[derive(Parser, Debug)]
#[command(name = "heroes")]
#[command(about = "Maintenance commands for the heroes store", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HEROES_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a liveness probe from the core crate
    Ping,
    /// Print the core crate version
    Version,
    /// Replace all roster data with the sample set
    Seed {
        /// Database connection string
        #[arg(long, env = "DB_URI", default_value = "sqlite:///app.db")]
        db: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, None) {
        eprintln!("heroes: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    match args.command {
        Command::Ping => println!("heroes_core ping={}", heroes_core::ping()),
        Command::Version => println!("heroes_core version={}", heroes_core::core_version()),
        Command::Seed { db } => {
            if let Err(message) = seed(&db) {
                error!("event=seed module=cli status=error error={message}");
                eprintln!("heroes: seed failed: {message}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn seed(uri: &str) -> Result<(), String> {
    let mut conn = open_from_uri(uri).map_err(|err| err.to_string())?;
    let summary = seed_sample_data(&mut conn).map_err(|err| err.to_string())?;
    println!(
        "seeded heroes={} powers={} hero_powers={}",
        summary.heroes, summary.powers, summary.hero_powers
    );
    Ok(())
}
