//! Commands accepted by a session and the events they produce.
//!
//! Commands are the only way external collaborators change the game. Each
//! accepted command yields the list of [`GameEvent`]s it caused, which a
//! renderer can use to animate or log without diffing snapshots.

use crate::phases::GameResult;
use crate::types::{Cell, Direction, PieceId, Seat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A command from the input-handling collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "command", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    /// Put a free piece on the board during placement.
    PlacePiece {
        /// Seat placing the piece.
        seat: Seat,
        /// Empty target cell.
        cell: Cell,
    },
    /// Select one of the acting seat's pieces.
    SelectPiece {
        /// Seat claiming the turn.
        seat: Seat,
        /// Cell the piece stands on.
        cell: Cell,
    },
    /// Drop the selection before the piece has moved.
    CancelSelection {
        /// Seat claiming the turn.
        seat: Seat,
    },
    /// Move the selected piece (its own cell means staying put).
    ChooseDestination {
        /// Destination from the legal set.
        cell: Cell,
    },
    /// Build a wall beside the moved piece.
    ChooseWallSide {
        /// Side from the legal set.
        side: Direction,
    },
    /// Spend the one-time token to remove a placed wall (3/4 players).
    BreakWall {
        /// Seat spending its token.
        seat: Seat,
        /// Cell on one side of the wall.
        cell: Cell,
        /// Side of `cell` the wall is on.
        side: Direction,
    },
    /// Time reported by the external clock.
    Tick {
        /// Elapsed time since the clock's origin.
        now: Duration,
    },
    /// Start over with a fresh board.
    Restart,
}

impl Command {
    /// Name of the command, as used in errors and logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Seat named by the command, if it carries one.
    pub fn seat(&self) -> Option<Seat> {
        match self {
            Command::PlacePiece { seat, .. }
            | Command::SelectPiece { seat, .. }
            | Command::CancelSelection { seat }
            | Command::BreakWall { seat, .. } => Some(*seat),
            Command::ChooseDestination { .. }
            | Command::ChooseWallSide { .. }
            | Command::Tick { .. }
            | Command::Restart => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::PlacePiece { seat, cell } => write!(f, "{seat} places at {cell}"),
            Command::SelectPiece { seat, cell } => write!(f, "{seat} selects {cell}"),
            Command::CancelSelection { seat } => write!(f, "{seat} cancels selection"),
            Command::ChooseDestination { cell } => write!(f, "move to {cell}"),
            Command::ChooseWallSide { side } => write!(f, "wall {side}"),
            Command::BreakWall { seat, cell, side } => {
                write!(f, "{seat} breaks wall {side} of {cell}")
            }
            Command::Tick { now } => write!(f, "tick {}ms", now.as_millis()),
            Command::Restart => write!(f, "restart"),
        }
    }
}

/// Something that happened while applying a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A piece was put on the board.
    PiecePlaced {
        /// New piece.
        piece: PieceId,
        /// Owner.
        seat: Seat,
        /// Where it stands.
        cell: Cell,
    },
    /// All pieces are on the board; the action phase begins.
    PlacementComplete,
    /// A seat's action turn began.
    TurnStarted {
        /// Acting seat.
        seat: Seat,
        /// Clock time at which the turn times out.
        deadline: Duration,
    },
    /// A seat had no piece able to act and was passed over.
    SeatSkipped {
        /// Skipped seat.
        seat: Seat,
    },
    /// A piece was selected.
    PieceSelected {
        /// Selected piece.
        piece: PieceId,
        /// Number of legal destinations.
        destinations: usize,
    },
    /// The selection was dropped before moving.
    SelectionCancelled {
        /// Previously selected piece.
        piece: PieceId,
    },
    /// A piece moved (possibly zero steps).
    PieceMoved {
        /// Moved piece.
        piece: PieceId,
        /// Cell it left.
        from: Cell,
        /// Cell it ended on.
        to: Cell,
    },
    /// A wall was built.
    WallPlaced {
        /// Builder.
        seat: Seat,
        /// Cell beside the wall.
        cell: Cell,
        /// Side of `cell`.
        side: Direction,
    },
    /// A wall was removed with a wall-break token.
    WallBroken {
        /// Seat that spent its token.
        seat: Seat,
        /// Cell beside the removed wall.
        cell: Cell,
        /// Side of `cell`.
        side: Direction,
    },
    /// The turn ran out; the engine acts on the seat's behalf.
    TurnTimedOut {
        /// Seat that ran out of time.
        seat: Seat,
        /// Piece the engine acted with.
        piece: PieceId,
    },
    /// The board is partitioned.
    GameFinished(GameResult),
    /// The session was reset.
    Restarted,
}
