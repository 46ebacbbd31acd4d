//! Error taxonomy for the rules engine.
//!
//! Every variant except [`GameError::EngineInvariantViolation`] is a
//! recoverable user error: the command is rejected and the session is left
//! exactly as it was.

use crate::phases::Phase;
use crate::types::{Cell, Direction, PieceId, Seat};

/// Error returned when a command cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The command is not valid in the current phase or step.
    #[display("Command {command} is not valid during {phase}")]
    InvalidCommand {
        /// Name of the rejected command.
        command: &'static str,
        /// Phase the game was in.
        phase: Phase,
    },

    /// The target cell, piece or side is not in the legal set.
    #[display("Illegal target: {_0}")]
    IllegalTarget(String),

    /// The acting seat is not the seat whose turn it is.
    #[display("It's not {actual}'s turn (waiting for {expected})")]
    OutOfTurn {
        /// Seat expected to act.
        expected: Seat,
        /// Seat that tried to act.
        actual: Seat,
    },

    /// Internal contradiction; the operation was aborted.
    #[display("Engine invariant violation: {_0}")]
    EngineInvariantViolation(String),
}

impl std::error::Error for GameError {}

impl GameError {
    /// Builds an [`GameError::IllegalTarget`] from anything displayable.
    pub fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalTarget(reason.into())
    }

    /// Whether the error leaves the session usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GameError::EngineInvariantViolation(_))
    }
}

/// Board-level invalid-state error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// A piece already stands on the cell.
    #[display("Cell {_0} is already occupied by {_1}")]
    Occupied(Cell, PieceId),

    /// The edge already carries a wall.
    #[display("Side {_1} of {_0} is already walled")]
    AlreadyWalled(Cell, Direction),

    /// The edge carries no wall.
    #[display("Side {_1} of {_0} has no wall")]
    NotWalled(Cell, Direction),

    /// Boundary walls can never be removed.
    #[display("Side {_1} of {_0} is part of the board boundary")]
    BoundaryWall(Cell, Direction),

    /// The coordinate lies outside the 7x7 grid.
    #[display("({_0}, {_1}) is off the board")]
    OffBoard(usize, usize),

    /// No piece with this id exists.
    #[display("Unknown piece {_0}")]
    UnknownPiece(PieceId),

    /// The board already holds the maximum number of pieces.
    #[display("No room for another piece")]
    TooManyPieces,
}

impl std::error::Error for BoardError {}

impl From<BoardError> for GameError {
    /// Board errors reaching the session mean a validator let an illegal
    /// mutation through.
    fn from(err: BoardError) -> Self {
        GameError::EngineInvariantViolation(err.to_string())
    }
}
