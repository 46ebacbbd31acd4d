//! Game configuration.

use crate::rules::DEFAULT_MAX_STEPS;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How the engine picks a piece when a turn times out before any selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPiecePolicy {
    /// The actionable piece with the lowest id.
    #[default]
    LowestId,
    /// A uniformly random actionable piece.
    Random,
}

/// Settings for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (2, 3 or 4).
    #[serde(default = "default_player_count")]
    player_count: usize,

    /// Seconds each seat has to finish an action turn.
    #[serde(default = "default_turn_time_limit_secs")]
    turn_time_limit_secs: u64,

    /// Steps a piece may take in one move.
    #[serde(default = "default_max_steps")]
    max_steps: usize,

    /// Piece forced to act when a turn times out before selection.
    #[serde(default)]
    timeout_piece_policy: TimeoutPiecePolicy,

    /// A piece that acted waits until every other actionable piece of its
    /// seat has acted too.
    #[serde(default = "default_piece_rotation")]
    piece_rotation: bool,

    /// Seed for the timeout fallback RNG. `None` seeds from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rng_seed: Option<u64>,
}

fn default_player_count() -> usize {
    2
}

fn default_turn_time_limit_secs() -> u64 {
    90
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

fn default_piece_rotation() -> bool {
    true
}

impl GameConfig {
    /// Creates a configuration for `player_count` players with default rules.
    #[instrument]
    pub fn new(player_count: usize) -> Result<Self, ConfigError> {
        let config = Self {
            player_count,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the turn time limit.
    ///
    /// # Errors
    ///
    /// The limit must be a positive whole number of seconds.
    #[track_caller]
    pub fn with_turn_time_limit(mut self, limit: Duration) -> Result<Self, ConfigError> {
        if limit.subsec_nanos() != 0 {
            return Err(ConfigError::new(format!(
                "turn time limit must be whole seconds (got {limit:?})"
            )));
        }
        self.turn_time_limit_secs = limit.as_secs();
        self.validate()?;
        Ok(self)
    }

    /// Turns the per-piece rotation rule on or off.
    pub fn with_piece_rotation(mut self, enabled: bool) -> Self {
        self.piece_rotation = enabled;
        self
    }

    /// Sets the timeout piece policy.
    pub fn with_timeout_piece_policy(mut self, policy: TimeoutPiecePolicy) -> Self {
        self.timeout_piece_policy = policy;
        self
    }

    /// Fixes the RNG seed, making timeout fallbacks reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Turn time limit as a duration.
    pub fn turn_time_limit(&self) -> Duration {
        Duration::from_secs(self.turn_time_limit_secs)
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            player_count = config.player_count,
            turn_time_limit_secs = config.turn_time_limit_secs,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }

    #[track_caller]
    fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=4).contains(&self.player_count) {
            return Err(ConfigError::new(format!(
                "player_count must be 2, 3 or 4 (got {})",
                self.player_count
            )));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::new("max_steps must be at least 1".to_string()));
        }
        if self.turn_time_limit_secs == 0 {
            return Err(ConfigError::new(
                "turn_time_limit_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
            turn_time_limit_secs: default_turn_time_limit_secs(),
            max_steps: default_max_steps(),
            timeout_piece_policy: TimeoutPiecePolicy::default(),
            piece_rotation: default_piece_rotation(),
            rng_seed: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
