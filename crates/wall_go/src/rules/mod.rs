//! Game rules for Wall Go.
//!
//! This module contains pure functions over a [`Board`](crate::Board):
//! legal destinations, legal wall sides, and territory analysis with
//! scoring. Rules never mutate the board; the turn controller does.

pub mod moves;
pub mod territory;
pub mod walls;

pub use moves::{DEFAULT_MAX_STEPS, is_actionable, legal_destinations};
pub use territory::{Occupancy, Territory, find_territories, is_partitioned, score};
pub use walls::{legal_wall_sides, require_wall_sides};
