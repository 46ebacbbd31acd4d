//! The 7x7 board: piece occupancy plus the set of walled edges.

use crate::error::BoardError;
use crate::types::{BOARD_SIZE, CELL_COUNT, Cell, Direction, Piece, PieceId, Seat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// An undirected edge between two cells, or between a cell and the boundary.
///
/// Side south of (r, c) and side north of (r + 1, c) name the same edge;
/// [`WallEdge::new`] folds both onto one canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallEdge {
    cell: Cell,
    side: Direction,
}

impl WallEdge {
    /// Canonical edge for `side` of `cell`.
    ///
    /// Interior edges are stored from the cell further south or east, facing
    /// north or west. Boundary edges keep the only cell they touch.
    pub fn new(cell: Cell, side: Direction) -> Self {
        match (side, cell.neighbor(side)) {
            (Direction::South | Direction::East, Some(other)) => Self {
                cell: other,
                side: side.opposite(),
            },
            _ => Self { cell, side },
        }
    }

    /// Cell the canonical form is anchored on.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Side of [`WallEdge::cell`] this edge lies on.
    pub fn side(&self) -> Direction {
        self.side
    }

    /// Whether the edge lies on the outer boundary.
    pub fn is_boundary(&self) -> bool {
        self.cell.neighbor(self.side).is_none()
    }

    /// The cells on either side of the edge (one for boundary edges).
    pub fn cells(&self) -> (Cell, Option<Cell>) {
        (self.cell, self.cell.neighbor(self.side))
    }
}

/// Who put a wall on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    /// Outer edge of the board, present from construction.
    Boundary,
    /// Built by a seat during play.
    Placed(Seat),
}

/// Board state: occupancy grid, piece list and walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    occupants: [Option<PieceId>; CELL_COUNT],
    pieces: Vec<Piece>,
    walls: BTreeMap<WallEdge, WallKind>,
}

impl Board {
    /// Creates an empty board with every boundary edge walled.
    #[instrument]
    pub fn new() -> Self {
        let walls = Cell::all()
            .flat_map(|cell| Direction::all().map(move |side| WallEdge::new(cell, side)))
            .filter(WallEdge::is_boundary)
            .map(|edge| (edge, WallKind::Boundary))
            .collect();

        Self {
            occupants: [None; CELL_COUNT],
            pieces: Vec::new(),
            walls,
        }
    }

    /// Piece standing on `cell`, if any.
    pub fn occupant_at(&self, cell: Cell) -> Option<PieceId> {
        self.occupants[cell.index()]
    }

    /// Checks if no piece stands on `cell`.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.occupant_at(cell).is_none()
    }

    /// Looks up a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Piece standing on `cell`, with its owner.
    pub fn piece_at(&self, cell: Cell) -> Option<&Piece> {
        self.occupant_at(cell).and_then(|id| self.piece(id))
    }

    /// All pieces in id order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Pieces owned by `seat`, in id order.
    pub fn pieces_of(&self, seat: Seat) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.seat == seat)
    }

    /// Checks whether `side` of `cell` carries a wall (boundary included).
    pub fn is_walled(&self, cell: Cell, side: Direction) -> bool {
        self.walls.contains_key(&WallEdge::new(cell, side))
    }

    /// Kind of wall on `side` of `cell`, if any.
    pub fn wall_at(&self, cell: Cell, side: Direction) -> Option<WallKind> {
        self.walls.get(&WallEdge::new(cell, side)).copied()
    }

    /// Every walled edge, boundary included.
    pub fn walls(&self) -> impl Iterator<Item = (&WallEdge, &WallKind)> {
        self.walls.iter()
    }

    /// Walls built during play.
    pub fn placed_walls(&self) -> impl Iterator<Item = (WallEdge, Seat)> + '_ {
        self.walls.iter().filter_map(|(edge, kind)| match kind {
            WallKind::Placed(seat) => Some((*edge, *seat)),
            WallKind::Boundary => None,
        })
    }

    /// Sides of `cell` without a wall.
    pub fn open_sides(&self, cell: Cell) -> Vec<Direction> {
        Direction::all()
            .filter(|side| !self.is_walled(cell, *side))
            .collect()
    }

    /// The adjacent cell across `side`, walled or not.
    pub fn neighbor(&self, cell: Cell, side: Direction) -> Option<Cell> {
        cell.neighbor(side)
    }

    /// The neighbour across `side` if no wall stands in between.
    pub fn open_neighbor(&self, cell: Cell, side: Direction) -> Option<Cell> {
        if self.is_walled(cell, side) {
            None
        } else {
            self.neighbor(cell, side)
        }
    }

    /// Puts a new piece for `seat` on `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Occupied`] if a piece already stands there.
    #[instrument(skip(self))]
    pub fn place_piece(&mut self, seat: Seat, cell: Cell) -> Result<PieceId, BoardError> {
        if let Some(existing) = self.occupant_at(cell) {
            return Err(BoardError::Occupied(cell, existing));
        }
        let id = u8::try_from(self.pieces.len())
            .map(PieceId)
            .map_err(|_| BoardError::TooManyPieces)?;
        self.pieces.push(Piece { id, seat, cell });
        self.occupants[cell.index()] = Some(id);
        debug!(%id, %seat, %cell, "Piece placed");
        Ok(id)
    }

    /// Relocates a piece. Moving onto its own cell is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownPiece`] or [`BoardError::Occupied`].
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, id: PieceId, to: Cell) -> Result<Cell, BoardError> {
        let from = self.piece(id).ok_or(BoardError::UnknownPiece(id))?.cell;
        if from == to {
            return Ok(from);
        }
        if let Some(existing) = self.occupant_at(to) {
            return Err(BoardError::Occupied(to, existing));
        }
        self.occupants[from.index()] = None;
        self.occupants[to.index()] = Some(id);
        self.pieces[id.index()].cell = to;
        debug!(%id, %from, %to, "Piece moved");
        Ok(from)
    }

    /// Builds a wall on `side` of `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AlreadyWalled`] if the edge is already walled.
    #[instrument(skip(self))]
    pub fn place_wall(&mut self, cell: Cell, side: Direction, seat: Seat) -> Result<(), BoardError> {
        let edge = WallEdge::new(cell, side);
        if self.walls.contains_key(&edge) {
            return Err(BoardError::AlreadyWalled(cell, side));
        }
        self.walls.insert(edge, WallKind::Placed(seat));
        debug!(%cell, %side, %seat, "Wall placed");
        Ok(())
    }

    /// Tears down a wall built during play.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotWalled`] for an open edge and
    /// [`BoardError::BoundaryWall`] for the board boundary.
    #[instrument(skip(self))]
    pub fn remove_wall(&mut self, cell: Cell, side: Direction) -> Result<Seat, BoardError> {
        let edge = WallEdge::new(cell, side);
        match self.walls.get(&edge) {
            None => Err(BoardError::NotWalled(cell, side)),
            Some(WallKind::Boundary) => Err(BoardError::BoundaryWall(cell, side)),
            Some(WallKind::Placed(seat)) => {
                let seat = *seat;
                self.walls.remove(&edge);
                debug!(%cell, %side, builder = %seat, "Wall removed");
                Ok(seat)
            }
        }
    }

    /// Formats the board as text: pieces by seat initial, walls as `|` and `---`.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            let cells: Vec<Cell> = Cell::all().filter(|c| c.row() == row).collect();
            for &cell in &cells {
                out.push('+');
                out.push_str(if self.is_walled(cell, Direction::North) {
                    "---"
                } else {
                    "   "
                });
            }
            out.push_str("+\n");
            for &cell in &cells {
                out.push(if self.is_walled(cell, Direction::West) {
                    '|'
                } else {
                    ' '
                });
                let mark = self.piece_at(cell).map_or('.', |p| seat_initial(p.seat));
                out.push(' ');
                out.push(mark);
                out.push(' ');
            }
            out.push_str("|\n");
        }
        for _ in 0..BOARD_SIZE {
            out.push_str("+---");
        }
        out.push_str("+\n");
        out
    }

    #[cfg(test)]
    pub(crate) fn force_set_occupant(&mut self, cell: Cell, occupant: Option<PieceId>) {
        self.occupants[cell.index()] = occupant;
    }

    #[cfg(test)]
    pub(crate) fn force_clear_edge(&mut self, cell: Cell, side: Direction) {
        self.walls.remove(&WallEdge::new(cell, side));
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn seat_initial(seat: Seat) -> char {
    match seat {
        Seat::Red => 'R',
        Seat::Blue => 'B',
        Seat::Green => 'G',
        Seat::Yellow => 'Y',
    }
}
