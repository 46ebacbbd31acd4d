//! Legal destinations for a selected piece.

use crate::board::Board;
use crate::types::{CELL_COUNT, Cell, Direction, PieceId};
use std::collections::{BTreeSet, VecDeque};
use tracing::instrument;

/// Number of steps a piece may take in one move.
pub const DEFAULT_MAX_STEPS: usize = 2;

/// Cells the piece can end its move on, staying put included.
///
/// Breadth-first search up to `max_steps` steps. A step crosses an edge only
/// if the edge has no wall and the cell beyond is empty; the piece may turn
/// between steps but never passes through another piece. The piece's own
/// starting cell counts as empty once it leaves.
///
/// Every reachable cell keeps the edge it was entered through open, so a wall
/// can always be built after the move. The one exception is a piece whose
/// own cell is sealed on all four sides: it has no destinations at all.
/// An unknown piece yields an empty set.
#[instrument(skip(board))]
pub fn legal_destinations(board: &Board, piece: PieceId, max_steps: usize) -> BTreeSet<Cell> {
    let Some(origin) = board.piece(piece).map(|p| p.cell) else {
        return BTreeSet::new();
    };
    if board.open_sides(origin).is_empty() {
        return BTreeSet::new();
    }

    let mut depth: [Option<usize>; CELL_COUNT] = [None; CELL_COUNT];
    let mut queue = VecDeque::new();
    depth[origin.index()] = Some(0);
    queue.push_back(origin);

    while let Some(cell) = queue.pop_front() {
        let steps = depth[cell.index()].unwrap_or(0);
        if steps == max_steps {
            continue;
        }
        for side in Direction::all() {
            let Some(next) = board.open_neighbor(cell, side) else {
                continue;
            };
            if depth[next.index()].is_some() {
                continue;
            }
            if next != origin && !board.is_empty(next) {
                continue;
            }
            depth[next.index()] = Some(steps + 1);
            queue.push_back(next);
        }
    }

    Cell::all()
        .filter(|cell| depth[cell.index()].is_some())
        .collect()
}

/// Checks whether the piece has at least one legal destination.
pub fn is_actionable(board: &Board, piece: PieceId, max_steps: usize) -> bool {
    !legal_destinations(board, piece, max_steps).is_empty()
}
