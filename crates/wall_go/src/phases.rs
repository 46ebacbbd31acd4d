//! Phases, outcomes and final scores.

use crate::types::Seat;
use serde::{Deserialize, Serialize};

/// Coarse game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Seats are putting their free pieces on the board.
    Placement,
    /// Seats take turns moving a piece and building a wall.
    Action,
    /// The board is partitioned; scores are final.
    Finished,
}

/// Sub-step of an action turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionStep {
    /// Waiting for the current seat to pick a piece.
    AwaitingSelection,
    /// A piece is selected; waiting for its destination.
    AwaitingMove,
    /// The piece has moved; waiting for the wall side.
    AwaitingWall,
}

/// Score of one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatScore {
    /// Seat being scored.
    pub seat: Seat,
    /// Cells in all territories owned exclusively by this seat.
    pub total: usize,
    /// Size of the largest such territory (tie-break).
    pub largest: usize,
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A seat won, on total or on largest territory.
    Winner(Seat),
    /// Totals and largest territories are tied.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Winner(seat) => Some(*seat),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }

    /// Picks the outcome from per-seat scores.
    ///
    /// Highest total wins; among seats tied on total the largest single
    /// territory wins; anything still tied is a draw.
    pub fn decide(scores: &[SeatScore]) -> Self {
        let Some(best_total) = scores.iter().map(|s| s.total).max() else {
            return Outcome::Draw;
        };
        let leaders: Vec<&SeatScore> = scores.iter().filter(|s| s.total == best_total).collect();
        if let [only] = leaders.as_slice() {
            return Outcome::Winner(only.seat);
        }

        let best_largest = leaders.iter().map(|s| s.largest).max().unwrap_or(0);
        let finalists: Vec<&&SeatScore> = leaders
            .iter()
            .filter(|s| s.largest == best_largest)
            .collect();
        match finalists.as_slice() {
            [only] => Outcome::Winner(only.seat),
            _ => Outcome::Draw,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(seat) => write!(f, "{seat} wins"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Final result of a game: frozen scores and the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Score per seat, in seat order.
    pub scores: Vec<SeatScore>,
    /// Winner or draw.
    pub outcome: Outcome,
}

impl GameResult {
    /// Builds the result from scores, deciding the outcome.
    pub fn from_scores(scores: Vec<SeatScore>) -> Self {
        let outcome = Outcome::decide(&scores);
        Self { scores, outcome }
    }

    /// Score of `seat`, if it took part.
    pub fn score_of(&self, seat: Seat) -> Option<&SeatScore> {
        self.scores.iter().find(|s| s.seat == seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(seat: Seat, total: usize, largest: usize) -> SeatScore {
        SeatScore {
            seat,
            total,
            largest,
        }
    }

    #[test]
    fn test_highest_total_wins() {
        let scores = [score(Seat::Red, 20, 12), score(Seat::Blue, 18, 18)];
        assert_eq!(Outcome::decide(&scores), Outcome::Winner(Seat::Red));
    }

    #[test]
    fn test_tie_broken_by_largest_territory() {
        let scores = [score(Seat::Red, 20, 12), score(Seat::Blue, 20, 15)];
        assert_eq!(Outcome::decide(&scores), Outcome::Winner(Seat::Blue));
    }

    #[test]
    fn test_full_tie_is_draw() {
        let scores = [score(Seat::Red, 20, 15), score(Seat::Blue, 20, 15)];
        assert!(Outcome::decide(&scores).is_draw());
    }

    #[test]
    fn test_tie_break_ignores_trailing_seats() {
        // Green has the largest territory but is not tied on total.
        let scores = [
            score(Seat::Red, 12, 6),
            score(Seat::Blue, 12, 8),
            score(Seat::Green, 10, 10),
        ];
        assert_eq!(Outcome::decide(&scores), Outcome::Winner(Seat::Blue));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Winner(Seat::Red).to_string(), "Red wins");
        assert_eq!(Outcome::Draw.to_string(), "Draw");
    }
}
