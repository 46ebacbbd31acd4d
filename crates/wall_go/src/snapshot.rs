//! Serializable view of a session for renderers.

use crate::phases::{ActionStep, GameResult, Outcome, Phase, SeatScore};
use crate::session::GameSession;
use crate::types::{Cell, Direction, Piece, PieceId, Player, Seat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A wall built during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallView {
    /// Cell the wall is anchored on.
    pub cell: Cell,
    /// Side of `cell`.
    pub side: Direction,
    /// Builder, for colouring.
    pub seat: Seat,
}

/// Everything a renderer needs to draw one frame.
///
/// Boundary walls are implied and not listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Coarse phase.
    pub phase: Phase,
    /// Action sub-step, if any.
    pub step: Option<ActionStep>,
    /// Seat expected to act.
    pub current_seat: Option<Seat>,
    /// Selected piece, if any.
    pub selected_piece: Option<PieceId>,
    /// Time left in the action turn.
    pub remaining_time: Option<Duration>,
    /// Free placements left, during placement.
    pub placements_remaining: Option<usize>,
    /// All pieces.
    pub pieces: Vec<Piece>,
    /// Walls built so far.
    pub walls: Vec<WallView>,
    /// Players with their wall-break tokens.
    pub players: Vec<Player>,
    /// Pieces the current seat may select.
    pub selectable_pieces: Vec<PieceId>,
    /// Pieces waiting for the rest of their seat to act.
    pub acted_pieces: Vec<PieceId>,
    /// Destinations of the selected piece.
    pub legal_destinations: Vec<Cell>,
    /// Sides open for the wall step.
    pub legal_wall_sides: Vec<Direction>,
    /// Provisional or final scores.
    pub scores: Vec<SeatScore>,
    /// Final result, once finished.
    pub result: Option<GameResult>,
}

impl From<&GameSession> for GameSnapshot {
    fn from(session: &GameSession) -> Self {
        let turn = session.turn();
        Self {
            phase: turn.phase(),
            step: turn.step(),
            current_seat: session.current_seat(),
            selected_piece: turn.selected_piece(),
            remaining_time: session.remaining_time(),
            placements_remaining: session.placements_remaining(),
            pieces: session.board().pieces().to_vec(),
            walls: session
                .board()
                .placed_walls()
                .map(|(edge, seat)| WallView {
                    cell: edge.cell(),
                    side: edge.side(),
                    seat,
                })
                .collect(),
            players: session.players().to_vec(),
            selectable_pieces: session.selectable_pieces(),
            acted_pieces: session.acted_pieces(),
            legal_destinations: session.legal_destinations().into_iter().collect(),
            legal_wall_sides: session.legal_wall_sides(),
            scores: session.scores(),
            result: session.result().cloned(),
        }
    }
}

impl GameSnapshot {
    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Returns a status string for display.
    pub fn status_string(&self) -> String {
        match (&self.result, self.current_seat, self.step) {
            (None, Some(seat), None) => match self.placements_remaining {
                Some(1) => format!("Placement. {seat} to place the last piece."),
                Some(left) => format!("Placement. {seat} to place a piece ({left} left)."),
                None => format!("Placement. {seat} to place a piece."),
            },
            (Some(result), _, _) => match result.outcome {
                Outcome::Winner(seat) => format!("Game over. {seat} wins!"),
                Outcome::Draw => "Game over. Draw!".to_string(),
            },
            (None, Some(seat), Some(ActionStep::AwaitingSelection)) => {
                format!("{seat} to select a piece.")
            }
            (None, Some(seat), Some(ActionStep::AwaitingMove)) => {
                format!("{seat} to move the selected piece.")
            }
            (None, Some(seat), Some(ActionStep::AwaitingWall)) => {
                format!("{seat} to build a wall.")
            }
            (None, None, _) => "Waiting".to_string(),
        }
    }
}
