//! Territory detection and scoring.
//!
//! A territory is a maximal set of cells connected through edges without a
//! wall. Territories are recomputed from the board on every query.

use crate::board::Board;
use crate::phases::SeatScore;
use crate::types::{CELL_COUNT, Cell, Direction, Seat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Which seats have pieces inside a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// No pieces.
    Empty,
    /// Pieces of exactly one seat.
    SinglePlayer(Seat),
    /// Pieces of two or more seats.
    Mixed,
}

/// A connected region of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    /// Cells of the region, in discovery order.
    pub cells: Vec<Cell>,
    /// Seats with at least one piece in the region.
    pub seats: BTreeSet<Seat>,
    /// Classification derived from `seats`.
    pub occupancy: Occupancy,
}

impl Territory {
    /// Number of cells in the region.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Checks if the region holds at least one piece.
    pub fn has_pieces(&self) -> bool {
        !self.seats.is_empty()
    }

    /// Seat owning the region exclusively, if any.
    pub fn owner(&self) -> Option<Seat> {
        match self.occupancy {
            Occupancy::SinglePlayer(seat) => Some(seat),
            Occupancy::Empty | Occupancy::Mixed => None,
        }
    }
}

/// Partitions the board into territories.
///
/// Iterative flood fill with an explicit stack; every cell ends up in
/// exactly one territory.
#[instrument(skip(board))]
pub fn find_territories(board: &Board) -> Vec<Territory> {
    let mut visited = [false; CELL_COUNT];
    let mut territories = Vec::new();

    for start in Cell::all() {
        if visited[start.index()] {
            continue;
        }

        let mut cells = Vec::new();
        let mut seats = BTreeSet::new();
        let mut stack = vec![start];
        visited[start.index()] = true;

        while let Some(cell) = stack.pop() {
            cells.push(cell);
            if let Some(piece) = board.piece_at(cell) {
                seats.insert(piece.seat);
            }
            for side in Direction::all() {
                if let Some(next) = board.open_neighbor(cell, side)
                    && !visited[next.index()]
                {
                    visited[next.index()] = true;
                    stack.push(next);
                }
            }
        }

        let occupancy = classify(&seats);
        territories.push(Territory {
            cells,
            seats,
            occupancy,
        });
    }

    debug!(count = territories.len(), "Territories found");
    territories
}

fn classify(seats: &BTreeSet<Seat>) -> Occupancy {
    let mut iter = seats.iter();
    match (iter.next(), iter.next()) {
        (None, _) => Occupancy::Empty,
        (Some(seat), None) => Occupancy::SinglePlayer(*seat),
        (Some(_), Some(_)) => Occupancy::Mixed,
    }
}

/// End condition: no territory holds pieces of more than one seat.
pub fn is_partitioned(territories: &[Territory]) -> bool {
    territories
        .iter()
        .filter(|t| t.has_pieces())
        .all(|t| matches!(t.occupancy, Occupancy::SinglePlayer(_)))
}

/// Scores every seat in `seats` from exclusively owned territories.
///
/// Empty territories belong to no one; mixed territories score nothing.
#[instrument(skip(territories))]
pub fn score(territories: &[Territory], seats: &[Seat]) -> Vec<SeatScore> {
    seats
        .iter()
        .map(|&seat| {
            let owned = territories.iter().filter(|t| t.owner() == Some(seat));
            let (total, largest) = owned.fold((0, 0), |(total, largest), t| {
                (total + t.size(), largest.max(t.size()))
            });
            SeatScore {
                seat,
                total,
                largest,
            }
        })
        .collect()
}
