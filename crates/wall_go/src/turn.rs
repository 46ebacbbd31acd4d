//! Turn and phase state machine.
//!
//! The controller sequences placement, then action turns of
//! select → move → wall, and owns the turn clock. Every transition consults
//! the rules before touching the board, and runs territory analysis after
//! each wall to decide whether the game is over.

use crate::action::GameEvent;
use crate::board::{Board, WallKind};
use crate::config::{GameConfig, TimeoutPiecePolicy};
use crate::error::{BoardError, GameError};
use crate::phases::{ActionStep, GameResult, Phase};
use crate::rules::{
    Territory, find_territories, is_actionable, is_partitioned, legal_destinations,
    require_wall_sides, score,
};
use crate::types::{Cell, Direction, PieceId, Player, Seat, WallBreak};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Pieces each seat owns once placement is over.
pub fn pieces_per_seat(player_count: usize) -> usize {
    if player_count == 2 { 4 } else { 2 }
}

/// Pieces put on the board before placement starts.
///
/// Two-player games start with Red on (1, 1) and (5, 5) and Blue on
/// (5, 1) and (1, 5). Larger games start empty.
pub fn fixed_pieces(player_count: usize) -> Vec<(Seat, Cell)> {
    if player_count != 2 {
        return Vec::new();
    }
    [
        (Seat::Red, 1, 1),
        (Seat::Red, 5, 5),
        (Seat::Blue, 5, 1),
        (Seat::Blue, 1, 5),
    ]
    .into_iter()
    .filter_map(|(seat, row, col)| Cell::new(row, col).map(|cell| (seat, cell)))
    .collect()
}

/// Order in which seats place their free pieces: forward, then backward.
///
/// Two players place Red, Blue, Blue, Red.
pub fn placement_order(seats: &[Seat]) -> Vec<Seat> {
    seats.iter().chain(seats.iter().rev()).copied().collect()
}

/// Where the game stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// Seats are placing pieces; `index` points into the placement order.
    Placement {
        /// Number of free placements already made.
        index: usize,
    },
    /// The current seat has to pick a piece.
    AwaitingSelection,
    /// A piece is selected and waits for its destination.
    AwaitingMove {
        /// Selected piece.
        piece: PieceId,
    },
    /// The piece has moved and waits for a wall beside it.
    AwaitingWall {
        /// Piece that moved.
        piece: PieceId,
        /// Cell it ended on.
        cell: Cell,
    },
    /// The board is partitioned.
    Finished(GameResult),
}

impl TurnState {
    /// Coarse phase of this state.
    pub fn phase(&self) -> Phase {
        match self {
            TurnState::Placement { .. } => Phase::Placement,
            TurnState::AwaitingSelection
            | TurnState::AwaitingMove { .. }
            | TurnState::AwaitingWall { .. } => Phase::Action,
            TurnState::Finished(_) => Phase::Finished,
        }
    }

    /// Action sub-step, if in the action phase.
    pub fn step(&self) -> Option<ActionStep> {
        match self {
            TurnState::AwaitingSelection => Some(ActionStep::AwaitingSelection),
            TurnState::AwaitingMove { .. } => Some(ActionStep::AwaitingMove),
            TurnState::AwaitingWall { .. } => Some(ActionStep::AwaitingWall),
            TurnState::Placement { .. } | TurnState::Finished(_) => None,
        }
    }

    /// Piece selected for the current turn.
    pub fn selected_piece(&self) -> Option<PieceId> {
        match self {
            TurnState::AwaitingMove { piece } | TurnState::AwaitingWall { piece, .. } => {
                Some(*piece)
            }
            _ => None,
        }
    }
}

/// Drives placement and action turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnController {
    seats: Vec<Seat>,
    placement_order: Vec<Seat>,
    current: usize,
    state: TurnState,
    clock: Duration,
    deadline: Option<Duration>,
    turn_limit: Duration,
    max_steps: usize,
    policy: TimeoutPiecePolicy,
    rotation: bool,
    acted: BTreeSet<PieceId>,
}

impl TurnController {
    /// Creates a controller at the start of placement, with the clock at `clock`.
    pub fn new(config: &GameConfig, clock: Duration) -> Self {
        let seats = Seat::for_count(*config.player_count());
        let placement_order = placement_order(&seats);
        Self {
            seats,
            placement_order,
            current: 0,
            state: TurnState::Placement { index: 0 },
            clock,
            deadline: None,
            turn_limit: config.turn_time_limit(),
            max_steps: *config.max_steps(),
            policy: *config.timeout_piece_policy(),
            rotation: *config.piece_rotation(),
            acted: BTreeSet::new(),
        }
    }

    /// Seats in turn order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Current state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Coarse phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Seat expected to act next, `None` once finished.
    pub fn current_seat(&self) -> Option<Seat> {
        match &self.state {
            TurnState::Placement { index } => self.placement_order.get(*index).copied(),
            TurnState::Finished(_) => None,
            _ => self.seats.get(self.current).copied(),
        }
    }

    /// Latest time reported by a tick.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Time at which the current action turn expires.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Time left in the current action turn.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(self.clock))
    }

    /// Steps a piece may take in one move.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Free placements still to be made, during placement.
    pub fn placements_remaining(&self) -> Option<usize> {
        match self.state {
            TurnState::Placement { index } => {
                Some(self.placement_order.len().saturating_sub(index))
            }
            _ => None,
        }
    }

    /// Pieces that acted in their seat's current rotation round.
    pub fn acted_pieces(&self) -> &BTreeSet<PieceId> {
        &self.acted
    }

    /// Pieces `seat` may act with now.
    ///
    /// These are the pieces with a legal destination. With rotation on, pieces
    /// that already acted this round are left out while any other remains.
    pub fn eligible_pieces(&self, board: &Board, seat: Seat) -> Vec<PieceId> {
        let actionable: Vec<PieceId> = board
            .pieces_of(seat)
            .map(|p| p.id)
            .filter(|id| is_actionable(board, *id, self.max_steps))
            .collect();
        if !self.rotation {
            return actionable;
        }
        let fresh: Vec<PieceId> = actionable
            .iter()
            .copied()
            .filter(|id| !self.acted.contains(id))
            .collect();
        if fresh.is_empty() { actionable } else { fresh }
    }

    /// Final result, once finished.
    pub fn result(&self) -> Option<&GameResult> {
        match &self.state {
            TurnState::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Puts a free piece on the board.
    ///
    /// # Errors
    ///
    /// [`GameError::OutOfTurn`] for the wrong seat and
    /// [`GameError::IllegalTarget`] for an occupied cell.
    #[instrument(skip(self, board, players))]
    pub fn place_piece(
        &mut self,
        board: &mut Board,
        players: &mut [Player],
        seat: Seat,
        cell: Cell,
    ) -> Result<Vec<GameEvent>, GameError> {
        let TurnState::Placement { index } = self.state else {
            return Err(self.unexpected("place_piece"));
        };
        self.expect_seat(seat)?;
        if let Some(existing) = board.occupant_at(cell) {
            return Err(GameError::illegal(format!(
                "{cell} is occupied by {existing}"
            )));
        }

        let player = player_mut(players, seat)?;
        let piece = board.place_piece(seat, cell)?;
        player.pieces.push(piece);
        let mut events = vec![GameEvent::PiecePlaced { piece, seat, cell }];

        let next = index + 1;
        if next < self.placement_order.len() {
            self.state = TurnState::Placement { index: next };
            debug!(next_seat = ?self.current_seat(), "Placement continues");
        } else {
            info!("Placement complete");
            events.push(GameEvent::PlacementComplete);
            self.start_turn_from(board, 0, &mut events);
        }
        Ok(events)
    }

    /// Selects one of the current seat's pieces.
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalTarget`] if the cell holds no piece of `seat`
    /// or the piece cannot move.
    #[instrument(skip(self, board))]
    pub fn select_piece(
        &mut self,
        board: &Board,
        seat: Seat,
        cell: Cell,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.state != TurnState::AwaitingSelection {
            return Err(self.unexpected("select_piece"));
        }
        self.expect_seat(seat)?;

        let piece = board
            .piece_at(cell)
            .ok_or_else(|| GameError::illegal(format!("no piece at {cell}")))?;
        if piece.seat != seat {
            return Err(GameError::illegal(format!(
                "piece at {cell} belongs to {}",
                piece.seat
            )));
        }
        let piece = piece.id;
        let destinations = legal_destinations(board, piece, self.max_steps);
        if destinations.is_empty() {
            return Err(GameError::illegal(format!(
                "piece at {cell} is sealed in"
            )));
        }
        if !self.eligible_pieces(board, seat).contains(&piece) {
            return Err(GameError::illegal(format!(
                "piece at {cell} already acted this round"
            )));
        }

        debug!(%piece, destinations = destinations.len(), "Piece selected");
        self.state = TurnState::AwaitingMove { piece };
        Ok(vec![GameEvent::PieceSelected {
            piece,
            destinations: destinations.len(),
        }])
    }

    /// Drops the selection before the piece moves.
    #[instrument(skip(self))]
    pub fn cancel_selection(&mut self, seat: Seat) -> Result<Vec<GameEvent>, GameError> {
        let TurnState::AwaitingMove { piece } = self.state else {
            return Err(self.unexpected("cancel_selection"));
        };
        self.expect_seat(seat)?;
        debug!(%piece, "Selection cancelled");
        self.state = TurnState::AwaitingSelection;
        Ok(vec![GameEvent::SelectionCancelled { piece }])
    }

    /// Moves the selected piece to `cell` (its own cell to stay put).
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalTarget`] if `cell` is not a legal destination.
    #[instrument(skip(self, board))]
    pub fn choose_destination(
        &mut self,
        board: &mut Board,
        cell: Cell,
    ) -> Result<Vec<GameEvent>, GameError> {
        let TurnState::AwaitingMove { piece } = self.state else {
            return Err(self.unexpected("choose_destination"));
        };
        if !legal_destinations(board, piece, self.max_steps).contains(&cell) {
            return Err(GameError::illegal(format!(
                "{cell} is not a legal destination"
            )));
        }

        let from = board.move_piece(piece, cell)?;
        require_wall_sides(board, cell)?;
        self.state = TurnState::AwaitingWall { piece, cell };
        Ok(vec![GameEvent::PieceMoved {
            piece,
            from,
            to: cell,
        }])
    }

    /// Builds a wall on `side` of the cell the piece moved to, then ends
    /// the turn.
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalTarget`] if that side is already walled.
    #[instrument(skip(self, board))]
    pub fn choose_wall_side(
        &mut self,
        board: &mut Board,
        side: Direction,
    ) -> Result<Vec<GameEvent>, GameError> {
        let TurnState::AwaitingWall { piece, cell } = self.state else {
            return Err(self.unexpected("choose_wall_side"));
        };
        let seat = self.acting_seat()?;
        if !require_wall_sides(board, cell)?.contains(&side) {
            return Err(GameError::illegal(format!(
                "side {side} of {cell} is already walled"
            )));
        }

        let mut events = Vec::new();
        self.build_wall(board, seat, piece, cell, side, &mut events)?;
        Ok(events)
    }

    /// Spends `seat`'s wall-break token to remove a placed wall.
    ///
    /// The turn stays at selection.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidCommand`] without a token and
    /// [`GameError::IllegalTarget`] for an open or boundary edge.
    #[instrument(skip(self, board, players))]
    pub fn break_wall(
        &mut self,
        board: &mut Board,
        players: &mut [Player],
        seat: Seat,
        cell: Cell,
        side: Direction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.state != TurnState::AwaitingSelection {
            return Err(self.unexpected("break_wall"));
        }
        self.expect_seat(seat)?;
        let phase = self.phase();
        let player = player_mut(players, seat)?;
        if player.wall_break != WallBreak::Available {
            return Err(GameError::InvalidCommand {
                command: "break_wall",
                phase,
            });
        }
        match board.wall_at(cell, side) {
            None => {
                return Err(GameError::illegal(format!(
                    "no wall on side {side} of {cell}"
                )));
            }
            Some(WallKind::Boundary) => {
                return Err(GameError::illegal(format!(
                    "side {side} of {cell} is the board boundary"
                )));
            }
            Some(WallKind::Placed(_)) => {}
        }

        let builder = board.remove_wall(cell, side)?;
        player.wall_break = WallBreak::Spent;
        info!(%seat, %cell, %side, %builder, "Wall broken");
        Ok(vec![GameEvent::WallBroken { seat, cell, side }])
    }

    /// Advances the clock and resolves an expired turn.
    ///
    /// Time never runs backwards: an earlier `now` leaves the clock as is.
    #[instrument(skip(self, board, rng))]
    pub fn tick(
        &mut self,
        board: &mut Board,
        rng: &mut StdRng,
        now: Duration,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.clock = self.clock.max(now);
        match self.deadline {
            Some(deadline) if self.clock >= deadline => self.expire(board, rng),
            _ => Ok(Vec::new()),
        }
    }

    /// Finishes the current turn on the seat's behalf.
    ///
    /// Without a selection a piece is forced per the timeout policy; a
    /// piece that has not moved stays put; the wall side is random.
    fn expire(&mut self, board: &mut Board, rng: &mut StdRng) -> Result<Vec<GameEvent>, GameError> {
        let seat = self.acting_seat()?;
        let (piece, cell, stays) = match self.state {
            TurnState::AwaitingSelection => {
                let piece = self.forced_piece(board, seat, rng)?;
                (piece, piece_cell(board, piece)?, true)
            }
            TurnState::AwaitingMove { piece } => (piece, piece_cell(board, piece)?, true),
            TurnState::AwaitingWall { piece, cell } => (piece, cell, false),
            TurnState::Placement { .. } | TurnState::Finished(_) => return Ok(Vec::new()),
        };

        let sides = require_wall_sides(board, cell)?;
        let side = *sides.choose(rng).ok_or_else(|| {
            GameError::EngineInvariantViolation(format!("no wall side at {cell}"))
        })?;
        warn!(%seat, %piece, %cell, %side, "Turn timed out; acting for the seat");

        let mut events = vec![GameEvent::TurnTimedOut { seat, piece }];
        if stays {
            events.push(GameEvent::PieceMoved {
                piece,
                from: cell,
                to: cell,
            });
        }
        self.state = TurnState::AwaitingWall { piece, cell };
        self.build_wall(board, seat, piece, cell, side, &mut events)?;
        Ok(events)
    }

    fn forced_piece(
        &self,
        board: &Board,
        seat: Seat,
        rng: &mut StdRng,
    ) -> Result<PieceId, GameError> {
        let candidates = self.eligible_pieces(board, seat);
        let chosen = match self.policy {
            TimeoutPiecePolicy::LowestId => candidates.first().copied(),
            TimeoutPiecePolicy::Random => candidates.choose(rng).copied(),
        };
        chosen.ok_or_else(|| {
            error!(%seat, "Seat on turn has no piece able to act");
            GameError::EngineInvariantViolation(format!("{seat} has no piece able to act"))
        })
    }

    fn build_wall(
        &mut self,
        board: &mut Board,
        seat: Seat,
        piece: PieceId,
        cell: Cell,
        side: Direction,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        board.place_wall(cell, side, seat)?;
        events.push(GameEvent::WallPlaced { seat, cell, side });
        self.record_action(board, seat, piece);

        let territories = find_territories(board);
        if is_partitioned(&territories) {
            self.finish(&territories, events);
        } else {
            let next = (self.current + 1) % self.seats.len().max(1);
            self.start_turn_from(board, next, events);
        }
        Ok(())
    }

    /// Hands the turn to the first seat, from `first` on, that can act.
    fn start_turn_from(&mut self, board: &Board, first: usize, events: &mut Vec<GameEvent>) {
        let count = self.seats.len();
        for offset in 0..count {
            let index = (first + offset) % count;
            let seat = self.seats[index];
            if self.can_act(board, seat) {
                let deadline = self.clock.saturating_add(self.turn_limit);
                self.current = index;
                self.deadline = Some(deadline);
                self.state = TurnState::AwaitingSelection;
                info!(%seat, deadline_secs = deadline.as_secs_f64(), "Turn started");
                events.push(GameEvent::TurnStarted { seat, deadline });
                return;
            }
            info!(%seat, "No piece able to act; seat skipped");
            events.push(GameEvent::SeatSkipped { seat });
        }

        warn!("No seat can act; scoring the board as it stands");
        let territories = find_territories(board);
        self.finish(&territories, events);
    }

    /// Marks `piece` as acted; once every actionable piece of `seat` has
    /// acted, the seat's round starts over.
    fn record_action(&mut self, board: &Board, seat: Seat, piece: PieceId) {
        if !self.rotation {
            return;
        }
        self.acted.insert(piece);
        let round_over = board
            .pieces_of(seat)
            .filter(|p| is_actionable(board, p.id, self.max_steps))
            .all(|p| self.acted.contains(&p.id));
        if round_over {
            self.acted
                .retain(|id| board.piece(*id).is_some_and(|p| p.seat != seat));
            debug!(%seat, "Every piece has acted; rotation starts over");
        }
    }

    fn finish(&mut self, territories: &[Territory], events: &mut Vec<GameEvent>) {
        let result = GameResult::from_scores(score(territories, &self.seats));
        info!(outcome = %result.outcome, "Game finished");
        self.deadline = None;
        self.state = TurnState::Finished(result.clone());
        events.push(GameEvent::GameFinished(result));
    }

    fn can_act(&self, board: &Board, seat: Seat) -> bool {
        board
            .pieces_of(seat)
            .any(|p| is_actionable(board, p.id, self.max_steps))
    }

    fn acting_seat(&self) -> Result<Seat, GameError> {
        self.current_seat()
            .ok_or_else(|| GameError::EngineInvariantViolation("no seat on turn".to_string()))
    }

    fn expect_seat(&self, actual: Seat) -> Result<(), GameError> {
        let expected = self.acting_seat()?;
        if actual == expected {
            Ok(())
        } else {
            Err(GameError::OutOfTurn { expected, actual })
        }
    }

    fn unexpected(&self, command: &'static str) -> GameError {
        GameError::InvalidCommand {
            command,
            phase: self.phase(),
        }
    }
}

fn player_mut(players: &mut [Player], seat: Seat) -> Result<&mut Player, GameError> {
    players
        .iter_mut()
        .find(|p| p.seat == seat)
        .ok_or_else(|| GameError::EngineInvariantViolation(format!("no player for {seat}")))
}

fn piece_cell(board: &Board, piece: PieceId) -> Result<Cell, GameError> {
    board
        .piece(piece)
        .map(|p| p.cell)
        .ok_or_else(|| BoardError::UnknownPiece(piece).into())
}
