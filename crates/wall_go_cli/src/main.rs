//! Wall Go - headless command-line driver
//!
//! Loads a game configuration, replays a scripted list of commands through
//! the rules engine and prints the events and the final board as text.

#![warn(missing_docs)]

mod cli;
mod replay;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use replay::Script;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;
use wall_go::{GameConfig, GameSession};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            config,
            strict,
            json,
        } => run_replay(&script, config, strict, json),
        Command::Config { config } => show_config(config),
    }
}

/// Loads the configuration file, or the defaults without one.
fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => Ok(GameConfig::from_file(path)?),
        None => {
            debug!("No config file given; using defaults");
            Ok(GameConfig::default())
        }
    }
}

/// Replay a script and print the outcome
#[instrument(skip(config))]
fn run_replay(script: &Path, config: Option<PathBuf>, strict: bool, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let script = Script::from_file(script)?;
    let mut session = GameSession::new(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = replay::run(&mut session, &script, strict, &mut out)?;

    let snapshot = session.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
    } else {
        writeln!(out)?;
        write!(out, "{}", session.board().display())?;
        writeln!(out, "{}", snapshot.status_string())?;
        for score in &snapshot.scores {
            writeln!(
                out,
                "{}: {} cells (largest {})",
                score.seat, score.total, score.largest
            )?;
        }
    }

    info!(
        applied = report.applied,
        rejected = report.rejected.len(),
        phase = %session.phase(),
        "Replay complete"
    );
    Ok(())
}

/// Print the effective configuration
fn show_config(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
