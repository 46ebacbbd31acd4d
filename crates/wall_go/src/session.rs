//! Game session: the aggregate that owns all mutable game state.
//!
//! A session accepts [`Command`]s one at a time through `&mut self`. Each
//! command runs against a copy of the state; the copy is adopted only if the
//! command's contract holds, so a rejected command leaves board, turn,
//! clock and RNG exactly as they were.

use crate::action::{Command, GameEvent};
use crate::board::Board;
use crate::config::GameConfig;
use crate::contracts::{CommandContract, Contract};
use crate::error::GameError;
use crate::phases::{GameResult, Phase, SeatScore};
use crate::rules::{self, Territory};
use crate::snapshot::GameSnapshot;
use crate::turn::{TurnController, TurnState, fixed_pieces};
use crate::types::{Cell, Direction, PieceId, Player, Seat, WallBreak};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Everything a command can change.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) players: Vec<Player>,
    pub(crate) turn: TurnController,
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Fresh state for `config` with the clock at zero.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Self::starting_at(config, Duration::ZERO)
    }

    /// Fresh state for `config` with the clock at `clock`.
    ///
    /// Two-player games get their fixed pieces here. The RNG is seeded from
    /// the configured seed, or from the OS without one.
    pub fn starting_at(config: &GameConfig, clock: Duration) -> Result<Self, GameError> {
        let turn = TurnController::new(config, clock);
        let seats = turn.seats();
        let wall_break = if seats.len() > 2 {
            WallBreak::Available
        } else {
            WallBreak::Unavailable
        };
        let mut players: Vec<Player> = seats
            .iter()
            .map(|&seat| Player::new(seat, wall_break))
            .collect();

        let mut board = Board::new();
        for (seat, cell) in fixed_pieces(seats.len()) {
            let piece = board.place_piece(seat, cell)?;
            if let Some(player) = players.iter_mut().find(|p| p.seat == seat) {
                player.pieces.push(piece);
            }
        }

        let rng = match config.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            board,
            players,
            turn,
            rng,
        })
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Player sitting at `seat`, if it takes part.
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    /// The turn controller.
    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    fn apply(&mut self, command: Command) -> Result<Vec<GameEvent>, GameError> {
        let Self {
            board,
            players,
            turn,
            rng,
        } = self;
        match command {
            Command::PlacePiece { seat, cell } => turn.place_piece(board, players, seat, cell),
            Command::SelectPiece { seat, cell } => turn.select_piece(board, seat, cell),
            Command::CancelSelection { seat } => turn.cancel_selection(seat),
            Command::ChooseDestination { cell } => turn.choose_destination(board, cell),
            Command::ChooseWallSide { side } => turn.choose_wall_side(board, side),
            Command::BreakWall { seat, cell, side } => {
                turn.break_wall(board, players, seat, cell, side)
            }
            Command::Tick { now } => turn.tick(board, rng, now),
            // Replaces the whole state; handled by the session.
            Command::Restart => Ok(Vec::new()),
        }
    }
}

/// A running game of Wall Go.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    state: GameState,
}

impl GameSession {
    /// Starts a session in the placement phase.
    #[instrument(skip(config), fields(players = *config.player_count()))]
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let state = GameState::new(&config)?;
        info!("Session created");
        Ok(Self { config, state })
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Full game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Applies a command and returns the events it produced.
    ///
    /// # Errors
    ///
    /// Any [`GameError`]; the session is unchanged when one is returned.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<GameEvent>, GameError> {
        if command == Command::Restart {
            return self.restart();
        }
        match self.transition(command) {
            Ok((next, events)) => {
                debug!(events = events.len(), "Command applied");
                self.state = next;
                Ok(events)
            }
            Err(err) => {
                if err.is_recoverable() {
                    warn!(%command, error = %err, "Command rejected");
                } else {
                    error!(%command, error = %err, "Command aborted");
                }
                Err(err)
            }
        }
    }

    fn transition(&self, command: Command) -> Result<(GameState, Vec<GameEvent>), GameError> {
        CommandContract::pre(&self.state, &command)?;
        let mut next = self.state.clone();
        let events = next.apply(command)?;
        CommandContract::post(&self.state, &next)?;
        Ok((next, events))
    }

    /// Places a free piece for `seat`.
    pub fn place_piece(&mut self, seat: Seat, cell: Cell) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::PlacePiece { seat, cell })
    }

    /// Selects the piece of `seat` on `cell`.
    pub fn select_piece(&mut self, seat: Seat, cell: Cell) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::SelectPiece { seat, cell })
    }

    /// Drops the current selection.
    pub fn cancel_selection(&mut self, seat: Seat) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::CancelSelection { seat })
    }

    /// Moves the selected piece.
    pub fn choose_destination(&mut self, cell: Cell) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::ChooseDestination { cell })
    }

    /// Builds the wall that ends the turn.
    pub fn choose_wall_side(&mut self, side: Direction) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::ChooseWallSide { side })
    }

    /// Spends the wall-break token of `seat`.
    pub fn break_wall(
        &mut self,
        seat: Seat,
        cell: Cell,
        side: Direction,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::BreakWall { seat, cell, side })
    }

    /// Reports the external clock.
    pub fn tick(&mut self, now: Duration) -> Result<Vec<GameEvent>, GameError> {
        self.dispatch(Command::Tick { now })
    }

    /// Starts over with the same configuration.
    ///
    /// The clock keeps its latest reading; the RNG is reseeded.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let clock = self.state.turn.clock();
        self.state = GameState::starting_at(&self.config, clock)?;
        info!("Session restarted");
        Ok(vec![GameEvent::Restarted])
    }

    /// The board.
    pub fn board(&self) -> &Board {
        self.state.board()
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    /// Current turn state.
    pub fn turn(&self) -> &TurnState {
        self.state.turn.state()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.turn.phase()
    }

    /// Seat expected to act.
    pub fn current_seat(&self) -> Option<Seat> {
        self.state.turn.current_seat()
    }

    /// Time left in the current action turn.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.state.turn.remaining_time()
    }

    /// Pieces the current seat may select, rotation included.
    pub fn selectable_pieces(&self) -> Vec<PieceId> {
        let (TurnState::AwaitingSelection, Some(seat)) = (self.turn(), self.current_seat()) else {
            return Vec::new();
        };
        self.state.turn.eligible_pieces(self.board(), seat)
    }

    /// Pieces that already acted in their seat's rotation round.
    pub fn acted_pieces(&self) -> Vec<PieceId> {
        self.state.turn.acted_pieces().iter().copied().collect()
    }

    /// Free placements left before the action phase.
    pub fn placements_remaining(&self) -> Option<usize> {
        self.state.turn.placements_remaining()
    }

    /// Legal destinations of the selected piece; empty without a selection.
    pub fn legal_destinations(&self) -> BTreeSet<Cell> {
        match self.turn() {
            TurnState::AwaitingMove { piece } => {
                rules::legal_destinations(self.board(), *piece, self.state.turn.max_steps())
            }
            _ => BTreeSet::new(),
        }
    }

    /// Legal wall sides after the move; empty outside the wall step.
    pub fn legal_wall_sides(&self) -> Vec<Direction> {
        match self.turn() {
            TurnState::AwaitingWall { cell, .. } => rules::legal_wall_sides(self.board(), *cell),
            _ => Vec::new(),
        }
    }

    /// Territories of the current board.
    pub fn territories(&self) -> Vec<Territory> {
        rules::find_territories(self.board())
    }

    /// Scores: frozen once finished, provisional before.
    pub fn scores(&self) -> Vec<SeatScore> {
        match self.result() {
            Some(result) => result.scores.clone(),
            None => rules::score(&self.territories(), self.state.turn.seats()),
        }
    }

    /// Final result, once finished.
    pub fn result(&self) -> Option<&GameResult> {
        self.state.turn.result()
    }

    /// Serializable view for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: usize, col: usize) -> Cell {
        Cell::new(row, col).unwrap()
    }

    fn seeded(players: usize) -> GameSession {
        GameSession::new(GameConfig::new(players).unwrap().with_rng_seed(5)).unwrap()
    }

    #[test]
    fn test_two_player_session_starts_with_fixed_pieces() {
        let session = seeded(2);
        assert_eq!(session.phase(), Phase::Placement);
        assert_eq!(session.current_seat(), Some(Seat::Red));
        assert_eq!(session.board().pieces().len(), 4);
        assert_eq!(session.players()[0].pieces.len(), 2);
        assert_eq!(session.players()[1].wall_break, WallBreak::Unavailable);
    }

    #[test]
    fn test_rejected_command_leaves_state_untouched() {
        let mut session = seeded(2);
        let before = session.board().clone();
        let turn_before = session.turn().clone();

        let err = session.place_piece(Seat::Red, cell(1, 1)).unwrap_err();
        assert!(matches!(err, GameError::IllegalTarget(_)));
        assert_eq!(session.board(), &before);
        assert_eq!(session.turn(), &turn_before);
    }

    #[test]
    fn test_restart_keeps_clock() {
        let mut session = seeded(2);
        session.tick(Duration::from_secs(30)).unwrap();
        let events = session.restart().unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(session.state().turn().clock(), Duration::from_secs(30));
    }

    #[test]
    fn test_queries_empty_outside_their_step() {
        let session = seeded(2);
        assert!(session.legal_destinations().is_empty());
        assert!(session.legal_wall_sides().is_empty());
        assert!(session.selectable_pieces().is_empty());
        assert_eq!(session.remaining_time(), None);
    }
}
