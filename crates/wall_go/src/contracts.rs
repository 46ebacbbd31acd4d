//! Contract-based validation for session commands.
//!
//! Contracts define correctness through preconditions and postconditions,
//! in the Hoare style `{P} command {Q}`. Preconditions gate a command on the
//! phase and the acting seat; postconditions verify the invariants of the
//! state the command produced before the session adopts it.

use crate::action::Command;
use crate::error::GameError;
use crate::invariants::{InvariantSet, WallGoInvariants};
use crate::session::GameState;
use crate::turn::TurnState;
use crate::types::WallBreak;
use tracing::{error, instrument};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), GameError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), GameError>;
}

// ─────────────────────────────────────────────────────────────
//  Command Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the command is valid in the current phase and step.
pub struct CommandInPhase;

impl CommandInPhase {
    /// Rejects commands the current turn state does not accept.
    #[instrument(skip(state))]
    pub fn check(command: &Command, state: &GameState) -> Result<(), GameError> {
        let turn = state.turn().state();
        let accepted = match command {
            Command::Tick { .. } | Command::Restart => true,
            Command::PlacePiece { .. } => matches!(turn, TurnState::Placement { .. }),
            Command::SelectPiece { .. } | Command::BreakWall { .. } => {
                matches!(turn, TurnState::AwaitingSelection)
            }
            Command::CancelSelection { .. } | Command::ChooseDestination { .. } => {
                matches!(turn, TurnState::AwaitingMove { .. })
            }
            Command::ChooseWallSide { .. } => matches!(turn, TurnState::AwaitingWall { .. }),
        };
        if accepted {
            Ok(())
        } else {
            Err(GameError::InvalidCommand {
                command: command.name(),
                phase: turn.phase(),
            })
        }
    }
}

/// Precondition: a seat named by the command is the seat whose turn it is.
pub struct SeatsTurn;

impl SeatsTurn {
    /// Rejects commands issued on behalf of another seat.
    #[instrument(skip(state))]
    pub fn check(command: &Command, state: &GameState) -> Result<(), GameError> {
        match (command.seat(), state.turn().current_seat()) {
            (Some(actual), Some(expected)) if actual != expected => {
                Err(GameError::OutOfTurn { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

/// Precondition: a wall-break is only issued by a seat holding the token.
pub struct WallBreakAvailable;

impl WallBreakAvailable {
    /// Rejects wall-breaks in two-player games and second uses.
    #[instrument(skip(state))]
    pub fn check(command: &Command, state: &GameState) -> Result<(), GameError> {
        let Command::BreakWall { seat, .. } = command else {
            return Ok(());
        };
        match state.player(*seat).map(|p| p.wall_break) {
            Some(WallBreak::Available) => Ok(()),
            _ => Err(GameError::InvalidCommand {
                command: command.name(),
                phase: state.turn().phase(),
            }),
        }
    }
}

/// Composite precondition: a command may be attempted in this state.
///
/// Targets (cells, pieces, sides) are validated against the legal sets by
/// the turn controller itself.
pub struct CommandAllowed;

impl CommandAllowed {
    /// Validates all preconditions for a command.
    #[instrument(skip(state))]
    pub fn check(command: &Command, state: &GameState) -> Result<(), GameError> {
        CommandInPhase::check(command, state)?;
        SeatsTurn::check(command, state)?;
        WallBreakAvailable::check(command, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Command Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for every session command.
///
/// Preconditions:
/// - Command is valid in the current phase and step
/// - Named seat is the seat to act
/// - Wall-break token is held
///
/// Postconditions:
/// - Pieces occupy distinct cells
/// - Boundary is walled
/// - Piece counts match the quotas
pub struct CommandContract;

impl Contract<GameState, Command> for CommandContract {
    fn pre(state: &GameState, command: &Command) -> Result<(), GameError> {
        CommandAllowed::check(command, state)
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), GameError> {
        WallGoInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            error!(violations = %descriptions, "Postcondition failed");
            GameError::EngineInvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
