//! Wall Go rules engine - board, moves, walls, turns and territory scoring
//!
//! This library implements the game state of Wall Go, a strategy game on a
//! 7x7 grid in which players move pieces and build walls until every region
//! of the board holds the pieces of a single player.
//!
//! # Architecture
//!
//! - **Board**: cells, pieces and the set of walled edges
//! - **Rules**: legal destinations, legal wall sides, territory analysis
//! - **Turn**: placement and action state machine with the turn timer
//! - **Session**: the aggregate that accepts commands and answers queries
//!
//! Rendering and input are left to the caller: it sends [`Command`]s and
//! draws from [`GameSnapshot`]s.
//!
//! # Example
//!
//! ```
//! use wall_go::{Cell, Command, GameConfig, GameEvent, GameSession, Seat};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GameConfig::new(2)?.with_rng_seed(7);
//! let mut session = GameSession::new(config)?;
//!
//! let cell = Cell::new(3, 3).ok_or("off the board")?;
//! let events = session.dispatch(Command::PlacePiece { seat: Seat::Red, cell })?;
//! assert!(matches!(events[0], GameEvent::PiecePlaced { seat: Seat::Red, .. }));
//! assert_eq!(session.current_seat(), Some(Seat::Blue));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Private module declarations
mod action;
mod board;
mod config;
mod error;
mod phases;
mod session;
mod snapshot;
mod turn;
mod types;

// Public modules
pub mod contracts;
pub mod invariants;
pub mod rules;

// Crate-level exports - Commands and events
pub use action::{Command, GameEvent};

// Crate-level exports - Board
pub use board::{Board, WallEdge, WallKind};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, TimeoutPiecePolicy};

// Crate-level exports - Errors
pub use error::{BoardError, GameError};

// Crate-level exports - Phases and results
pub use phases::{ActionStep, GameResult, Outcome, Phase, SeatScore};

// Crate-level exports - Session
pub use session::{GameSession, GameState};
pub use snapshot::{GameSnapshot, WallView};
pub use turn::{TurnController, TurnState, fixed_pieces, pieces_per_seat, placement_order};

// Crate-level exports - Domain types
pub use types::{
    BOARD_SIZE, CELL_COUNT, Cell, Direction, Piece, PieceId, Player, Seat, WallBreak,
};
