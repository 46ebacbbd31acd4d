//! Command-line interface for wall_go.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wall Go - headless driver for the rules engine
#[derive(Parser, Debug)]
#[command(name = "wall_go")]
#[command(about = "Replays scripted Wall Go games through the rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a TOML script of commands and print the resulting game
    Replay {
        /// Path to the script (a list of `[[step]]` tables)
        script: PathBuf,

        /// Path to the game configuration; defaults apply without one
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop at the first rejected command
        #[arg(long)]
        strict: bool,

        /// Print the final snapshot as JSON instead of the board
        #[arg(long)]
        json: bool,
    },

    /// Print the effective game configuration as TOML
    Config {
        /// Path to the game configuration; defaults apply without one
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::parse_from(["wall_go", "replay", "game.toml", "--strict"]);
        match cli.command {
            Command::Replay {
                script,
                config,
                strict,
                json,
            } => {
                assert_eq!(script, PathBuf::from("game.toml"));
                assert!(config.is_none());
                assert!(strict);
                assert!(!json);
            }
            Command::Config { .. } => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_config_with_path() {
        let cli = Cli::parse_from(["wall_go", "config", "-c", "wall_go.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config { config: Some(path) } if path == PathBuf::from("wall_go.toml")
        ));
    }
}
