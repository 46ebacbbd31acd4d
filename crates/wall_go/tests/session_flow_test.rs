//! Tests for the action phase: select, move, wall, game end and restart.

use wall_go::invariants::{InvariantSet, WallGoInvariants};
use wall_go::{
    ActionStep, Cell, Command, Direction, GameConfig, GameError, GameEvent, GameSession, Phase,
    Seat, TurnState,
};

fn cell(row: usize, col: usize) -> Cell {
    Cell::new(row, col).unwrap()
}

/// Two-player session right after placement, Red to act.
///
/// Red: #0 (1,1), #1 (5,5), #4 (0,0), #7 (6,6).
/// Blue: #2 (5,1), #3 (1,5), #5 (0,6), #6 (6,0).
fn two_player_action() -> GameSession {
    let mut session =
        GameSession::new(GameConfig::default().with_rng_seed(11)).unwrap();
    session.place_piece(Seat::Red, cell(0, 0)).unwrap();
    session.place_piece(Seat::Blue, cell(0, 6)).unwrap();
    session.place_piece(Seat::Blue, cell(6, 0)).unwrap();
    session.place_piece(Seat::Red, cell(6, 6)).unwrap();
    session
}

/// Plays until the game ends, always taking the first legal option.
fn play_out(session: &mut GameSession) -> usize {
    let mut turns = 0;
    while session.phase() == Phase::Action {
        let seat = session.current_seat().unwrap();
        let piece = session.selectable_pieces()[0];
        let from = session.board().piece(piece).unwrap().cell;
        session.select_piece(seat, from).unwrap();

        let to = *session.legal_destinations().iter().next().unwrap();
        session.choose_destination(to).unwrap();

        let sides = session.legal_wall_sides();
        assert!(!sides.is_empty(), "no wall side at {to}");
        session.choose_wall_side(sides[0]).unwrap();

        assert!(WallGoInvariants::check_all(session.state()).is_ok());
        turns += 1;
        assert!(turns <= 84, "game did not end");
    }
    turns
}

#[test]
fn test_full_turn_passes_to_blue() {
    let mut session = two_player_action();

    let events = session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    assert!(matches!(events[0], GameEvent::PieceSelected { .. }));
    assert_eq!(session.turn().step(), Some(ActionStep::AwaitingMove));
    assert!(session.legal_destinations().contains(&cell(3, 1)));

    let events = session.choose_destination(cell(3, 1)).unwrap();
    assert!(matches!(
        events[0],
        GameEvent::PieceMoved { from, to, .. } if from == cell(1, 1) && to == cell(3, 1)
    ));
    assert_eq!(session.legal_wall_sides().len(), 4);

    let events = session.choose_wall_side(Direction::East).unwrap();
    assert_eq!(
        events[0],
        GameEvent::WallPlaced {
            seat: Seat::Red,
            cell: cell(3, 1),
            side: Direction::East
        }
    );
    assert!(session.board().is_walled(cell(3, 2), Direction::West));
    assert_eq!(session.current_seat(), Some(Seat::Blue));
    assert_eq!(*session.turn(), TurnState::AwaitingSelection);
}

#[test]
fn test_piece_waits_for_its_partners_before_acting_again() {
    let mut session = two_player_action();
    let first = session.board().occupant_at(cell(1, 1)).unwrap();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    session.choose_destination(cell(1, 1)).unwrap();
    session.choose_wall_side(Direction::East).unwrap();
    session.select_piece(Seat::Blue, cell(1, 5)).unwrap();
    session.choose_destination(cell(1, 5)).unwrap();
    session.choose_wall_side(Direction::West).unwrap();

    assert!(matches!(
        session.select_piece(Seat::Red, cell(1, 1)),
        Err(GameError::IllegalTarget(_))
    ));
    assert_eq!(*session.turn(), TurnState::AwaitingSelection);
    assert!(!session.selectable_pieces().contains(&first));
    assert_eq!(session.selectable_pieces().len(), 3);
    assert!(session.snapshot().acted_pieces.contains(&first));

    session.select_piece(Seat::Red, cell(5, 5)).unwrap();
}

#[test]
fn test_piece_rotation_disabled_allows_same_piece() {
    let mut session = GameSession::new(
        GameConfig::default()
            .with_rng_seed(11)
            .with_piece_rotation(false),
    )
    .unwrap();
    for (seat, target) in [
        (Seat::Red, cell(0, 0)),
        (Seat::Blue, cell(0, 6)),
        (Seat::Blue, cell(6, 0)),
        (Seat::Red, cell(6, 6)),
    ] {
        session.place_piece(seat, target).unwrap();
    }
    for (seat, at) in [(Seat::Red, cell(1, 1)), (Seat::Blue, cell(1, 5))] {
        session.select_piece(seat, at).unwrap();
        session.choose_destination(at).unwrap();
        session.choose_wall_side(Direction::South).unwrap();
    }

    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    assert!(session.snapshot().acted_pieces.is_empty());
}

#[test]
fn test_no_double_move() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    session.choose_destination(cell(2, 1)).unwrap();

    let err = session.choose_destination(cell(3, 1)).unwrap_err();
    assert!(matches!(err, GameError::InvalidCommand { phase: Phase::Action, .. }));
    assert!(session.board().is_empty(cell(3, 1)));
}

#[test]
fn test_no_double_wall() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    session.choose_destination(cell(1, 1)).unwrap();
    session.choose_wall_side(Direction::South).unwrap();

    let err = session.choose_wall_side(Direction::East).unwrap_err();
    assert!(matches!(err, GameError::InvalidCommand { .. }));
    assert_eq!(session.board().placed_walls().count(), 1);
}

#[test]
fn test_selecting_opponent_piece_rejected() {
    let mut session = two_player_action();
    assert!(matches!(
        session.select_piece(Seat::Red, cell(5, 1)),
        Err(GameError::IllegalTarget(_))
    ));
    assert_eq!(
        session.select_piece(Seat::Blue, cell(5, 1)),
        Err(GameError::OutOfTurn {
            expected: Seat::Red,
            actual: Seat::Blue
        })
    );
    assert!(matches!(
        session.select_piece(Seat::Red, cell(3, 3)),
        Err(GameError::IllegalTarget(_))
    ));
    assert_eq!(*session.turn(), TurnState::AwaitingSelection);
}

#[test]
fn test_illegal_destination_rejected() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();

    // Three steps away.
    assert!(matches!(
        session.choose_destination(cell(4, 1)),
        Err(GameError::IllegalTarget(_))
    ));
    // Occupied by Blue.
    assert!(matches!(
        session.choose_destination(cell(1, 5)),
        Err(GameError::IllegalTarget(_))
    ));
    assert_eq!(session.turn().step(), Some(ActionStep::AwaitingMove));
    assert_eq!(session.board().occupant_at(cell(1, 1)).map(|p| p.0), Some(0));
}

#[test]
fn test_boundary_side_not_offered() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(0, 0)).unwrap();
    session.choose_destination(cell(0, 0)).unwrap();

    assert_eq!(
        session.legal_wall_sides(),
        vec![Direction::East, Direction::South]
    );
    assert!(matches!(
        session.choose_wall_side(Direction::North),
        Err(GameError::IllegalTarget(_))
    ));
}

#[test]
fn test_cancel_selection_then_pick_another() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    let events = session.cancel_selection(Seat::Red).unwrap();
    assert!(matches!(events[0], GameEvent::SelectionCancelled { .. }));

    session.select_piece(Seat::Red, cell(5, 5)).unwrap();
    assert_eq!(
        session.turn().selected_piece(),
        session.board().occupant_at(cell(5, 5))
    );
}

#[test]
fn test_game_plays_to_completion() {
    let mut session = two_player_action();
    let turns = play_out(&mut session);
    assert!(turns > 0);

    let result = session.result().unwrap().clone();
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.current_seat(), None);
    assert_eq!(session.remaining_time(), None);
    assert_eq!(session.scores(), result.scores);
    assert_eq!(result.outcome, wall_go::Outcome::decide(&result.scores));
    assert!(wall_go::rules::is_partitioned(&session.territories()));
}

#[test]
fn test_finished_game_rejects_commands() {
    let mut session = two_player_action();
    play_out(&mut session);
    let board = session.board().clone();

    assert!(matches!(
        session.select_piece(Seat::Red, cell(0, 0)),
        Err(GameError::InvalidCommand {
            phase: Phase::Finished,
            ..
        })
    ));
    assert!(matches!(
        session.place_piece(Seat::Red, cell(3, 3)),
        Err(GameError::InvalidCommand { .. })
    ));
    assert_eq!(
        session.tick(std::time::Duration::from_secs(1_000)),
        Ok(Vec::new())
    );
    assert_eq!(session.board(), &board);
}

#[test]
fn test_restart_from_finished() {
    let mut session = two_player_action();
    play_out(&mut session);

    let events = session.dispatch(Command::Restart).unwrap();
    assert_eq!(events, vec![GameEvent::Restarted]);
    assert_eq!(session.phase(), Phase::Placement);
    assert_eq!(session.current_seat(), Some(Seat::Red));
    assert_eq!(session.board().pieces().len(), 4);
    assert_eq!(session.board().placed_walls().count(), 0);
    assert!(session.result().is_none());
}

#[test]
fn test_restart_mid_turn() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();
    session.restart().unwrap();
    assert_eq!(*session.turn(), TurnState::Placement { index: 0 });
}

#[test]
fn test_queries_are_idempotent() {
    let mut session = two_player_action();
    session.select_piece(Seat::Red, cell(1, 1)).unwrap();

    let first = session.snapshot();
    let destinations = session.legal_destinations();
    let territories = session.territories();
    assert_eq!(session.snapshot(), first);
    assert_eq!(session.legal_destinations(), destinations);
    assert_eq!(session.territories(), territories);
    assert_eq!(first.status_string(), "Red to move the selected piece.");
}

#[test]
fn test_same_script_same_events() {
    let script = [
        Command::SelectPiece {
            seat: Seat::Red,
            cell: cell(1, 1),
        },
        Command::ChooseDestination { cell: cell(2, 2) },
        Command::ChooseWallSide {
            side: Direction::South,
        },
        Command::SelectPiece {
            seat: Seat::Blue,
            cell: cell(5, 1),
        },
        Command::ChooseDestination { cell: cell(4, 1) },
        Command::ChooseWallSide {
            side: Direction::East,
        },
    ];

    let mut a = two_player_action();
    let mut b = two_player_action();
    for command in script {
        assert_eq!(a.dispatch(command), b.dispatch(command));
    }
    assert_eq!(a.snapshot(), b.snapshot());
}
