//! Core domain types for Wall Go.

use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 7;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell on the 7x7 board, addressed by row (top to bottom) and column.
///
/// Every `Cell` lies on the board; deserializing an off-board coordinate
/// fails.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "RawCell")]
#[display("({row}, {col})")]
pub struct Cell {
    row: u8,
    col: u8,
}

/// Unchecked wire form of a [`Cell`].
#[derive(Deserialize)]
struct RawCell {
    row: usize,
    col: usize,
}

impl TryFrom<RawCell> for Cell {
    type Error = BoardError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        Cell::new(raw.row, raw.col).ok_or(BoardError::OffBoard(raw.row, raw.col))
    }
}

impl Cell {
    /// Creates a cell, or `None` if the coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Creates a cell from a row-major index (0-48).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
    }

    /// Row-major index of this cell (0-48).
    pub fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// Row of this cell.
    pub fn row(self) -> usize {
        usize::from(self.row)
    }

    /// Column of this cell.
    pub fn col(self) -> usize {
        usize::from(self.col)
    }

    /// The adjacent cell in `direction`, or `None` past the board edge.
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row().checked_add_signed(dr)?;
        let col = self.col().checked_add_signed(dc)?;
        Self::new(row, col)
    }

    /// All 49 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT).filter_map(Cell::from_index)
    }
}

/// One of the four sides of a cell.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    North,
    /// Towards the last column.
    East,
    /// Towards the last row.
    South,
    /// Towards column 0.
    West,
}

impl Direction {
    /// The side facing this one across an edge.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Row and column offsets of one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// All four directions in clockwise order starting at north.
    pub fn all() -> impl Iterator<Item = Direction> {
        Direction::iter()
    }
}

/// A seat at the table. Two-player games use Red and Blue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// First seat; acts first.
    Red,
    /// Second seat.
    Blue,
    /// Third seat (3 and 4 player games).
    Green,
    /// Fourth seat (4 player games).
    Yellow,
}

impl Seat {
    /// Seats taking part in a game with `player_count` players, in turn order.
    pub fn for_count(player_count: usize) -> Vec<Seat> {
        Seat::iter().take(player_count).collect()
    }
}

/// Identifier of a piece. Ids are handed out in placement order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct PieceId(pub u8);

impl PieceId {
    /// Position of the piece in the board's piece list.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A piece on the board. Pieces are never captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Piece identifier.
    pub id: PieceId,
    /// Owning seat.
    pub seat: Seat,
    /// Current cell.
    pub cell: Cell,
}

/// State of a player's one-time wall-break allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallBreak {
    /// Two-player games have no wall-break.
    Unavailable,
    /// The token can still be spent.
    Available,
    /// The token was spent this game.
    Spent,
}

/// A player: seat, owned pieces and wall-break token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat of this player.
    pub seat: Seat,
    /// Pieces owned by this player, in placement order.
    pub pieces: Vec<PieceId>,
    /// Wall-break allowance.
    pub wall_break: WallBreak,
}

impl Player {
    /// Creates a player with no pieces yet.
    pub fn new(seat: Seat, wall_break: WallBreak) -> Self {
        Self {
            seat,
            pieces: Vec::new(),
            wall_break,
        }
    }
}
