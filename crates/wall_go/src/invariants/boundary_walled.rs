//! Boundary invariant: the outer edge of the board is always walled.

use super::Invariant;
use crate::board::WallKind;
use crate::session::GameState;
use crate::types::{Cell, Direction};

/// Invariant: every outer edge carries a boundary wall.
pub struct BoundaryWalledInvariant;

impl Invariant<GameState> for BoundaryWalledInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();
        Cell::all()
            .flat_map(|cell| Direction::all().map(move |side| (cell, side)))
            .filter(|(cell, side)| cell.neighbor(*side).is_none())
            .all(|(cell, side)| board.wall_at(cell, side) == Some(WallKind::Boundary))
    }

    fn description() -> &'static str {
        "All outer edges of the board are walled"
    }
}
