//! Legal wall sides after a move.

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Cell, Direction};
use tracing::{error, instrument};

/// Sides of `cell` that carry no wall yet. Boundary sides are always walled.
#[instrument(skip(board))]
pub fn legal_wall_sides(board: &Board, cell: Cell) -> Vec<Direction> {
    board.open_sides(cell)
}

/// Like [`legal_wall_sides`], for a cell a piece has just legally moved to.
///
/// # Errors
///
/// An empty set cannot happen after a legal move, so it is reported as
/// [`GameError::EngineInvariantViolation`].
#[instrument(skip(board))]
pub fn require_wall_sides(board: &Board, cell: Cell) -> Result<Vec<Direction>, GameError> {
    let sides = legal_wall_sides(board, cell);
    if sides.is_empty() {
        error!(%cell, "No wall side left after a legal move");
        return Err(GameError::EngineInvariantViolation(format!(
            "no open side at {cell} after a legal move"
        )));
    }
    Ok(sides)
}
