//! Piece count invariant: seats own exactly the pieces the rules hand out.

use super::Invariant;
use crate::phases::Phase;
use crate::session::GameState;
use crate::turn::pieces_per_seat;
use crate::types::PieceId;

/// Invariant: each player's piece list matches the board, within quota.
///
/// During placement a seat may own fewer pieces than its quota; afterwards
/// it owns exactly its quota. Every piece on the board belongs to a player.
pub struct PieceCountInvariant;

impl Invariant<GameState> for PieceCountInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();
        let players = state.players();
        let quota = pieces_per_seat(players.len());
        let placing = state.turn().phase() == Phase::Placement;

        let lists_match = players.iter().all(|player| {
            let on_board: Vec<PieceId> = board.pieces_of(player.seat).map(|p| p.id).collect();
            let within_quota = if placing {
                on_board.len() <= quota
            } else {
                on_board.len() == quota
            };
            on_board == player.pieces && within_quota
        });
        let owned: usize = players.iter().map(|p| p.pieces.len()).sum();

        lists_match && owned == board.pieces().len()
    }

    fn description() -> &'static str {
        "Each seat owns its quota of pieces and the board holds no others"
    }
}
