//! Scripted replays: a TOML list of commands fed through a session.
//!
//! A script is a sequence of `[[step]]` tables, each one a command in the
//! engine's serialized form:
//!
//! ```toml
//! [[step]]
//! command = "place_piece"
//! seat = "red"
//! cell = { row = 3, col = 3 }
//!
//! [[step]]
//! command = "tick"
//! now = { secs = 90, nanos = 0 }
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use wall_go::{Command, GameError, GameSession};

/// A parsed replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Commands in the order they are dispatched.
    #[serde(default, rename = "step")]
    pub steps: Vec<Command>,
}

impl Script {
    /// Reads and parses a script file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read script {}", path.as_ref().display()))?;
        Self::from_toml(&text)
    }

    /// Parses a script from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let script: Self = toml::from_str(text).context("Failed to parse script")?;
        debug!(steps = script.steps.len(), "Script parsed");
        Ok(script)
    }
}

/// What happened during a replay.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Commands the session accepted.
    pub applied: usize,
    /// Rejected commands by step number (1-based).
    pub rejected: Vec<(usize, GameError)>,
}

/// Dispatches every step and writes each command with its events to `out`.
///
/// Rejected commands are reported and skipped, unless `strict` is set, in
/// which case the first one aborts the replay. Engine invariant violations
/// always abort.
#[instrument(skip_all, fields(steps = script.steps.len(), strict = strict))]
pub fn run(
    session: &mut GameSession,
    script: &Script,
    strict: bool,
    out: &mut impl Write,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (number, command) in script.steps.iter().enumerate().map(|(i, c)| (i + 1, *c)) {
        writeln!(out, "[{number}] {command}")?;
        match session.dispatch(command) {
            Ok(events) => {
                for event in &events {
                    writeln!(out, "    {}", serde_json::to_string(event)?)?;
                }
                report.applied += 1;
            }
            Err(err) if err.is_recoverable() && !strict => {
                warn!(step = number, error = %err, "Step rejected");
                writeln!(out, "    rejected: {err}")?;
                report.rejected.push((number, err));
            }
            Err(err) => bail!("Step {number} ({command}) failed: {err}"),
        }
    }

    info!(
        applied = report.applied,
        rejected = report.rejected.len(),
        "Replay finished"
    );
    Ok(report)
}
