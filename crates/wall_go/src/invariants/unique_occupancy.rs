//! Unique occupancy invariant: one piece per cell, grid and piece list agree.

use super::Invariant;
use crate::session::GameState;

/// Invariant: no two pieces share a cell.
///
/// Every piece's cell names that piece as its occupant, and the grid holds
/// no occupant beyond the piece list.
pub struct UniqueOccupancyInvariant;

impl Invariant<GameState> for UniqueOccupancyInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();
        let placed = board
            .pieces()
            .iter()
            .all(|piece| board.occupant_at(piece.cell) == Some(piece.id));
        let occupied = crate::types::Cell::all()
            .filter(|cell| !board.is_empty(*cell))
            .count();
        placed && occupied == board.pieces().len()
    }

    fn description() -> &'static str {
        "Each piece occupies its own cell and the grid matches the piece list"
    }
}
