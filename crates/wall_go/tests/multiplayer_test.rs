//! Tests for three and four player games: wall-break and seat skipping.

use wall_go::{
    Cell, Direction, GameConfig, GameError, GameEvent, GameSession, Phase, Seat, TurnState,
    WallBreak,
};

fn cell(row: usize, col: usize) -> Cell {
    Cell::new(row, col).unwrap()
}

/// Three-player session right after placement, Red to act.
///
/// Red: (0,0), (3,0). Blue: (0,6), (3,6). Green: (6,0), (6,6).
fn three_player_action() -> GameSession {
    let mut session = GameSession::new(GameConfig::new(3).unwrap().with_rng_seed(4)).unwrap();
    let placements = [
        (Seat::Red, cell(0, 0)),
        (Seat::Blue, cell(0, 6)),
        (Seat::Green, cell(6, 0)),
        (Seat::Green, cell(6, 6)),
        (Seat::Blue, cell(3, 6)),
        (Seat::Red, cell(3, 0)),
    ];
    for (seat, target) in placements {
        session.place_piece(seat, target).unwrap();
    }
    session
}

/// Select, move and wall in one go.
fn play(
    session: &mut GameSession,
    seat: Seat,
    from: Cell,
    to: Cell,
    side: Direction,
) -> Vec<GameEvent> {
    session.select_piece(seat, from).unwrap();
    session.choose_destination(to).unwrap();
    session.choose_wall_side(side).unwrap()
}

#[test]
fn test_wall_break_tokens_by_player_count() {
    let two = GameSession::new(GameConfig::default()).unwrap();
    assert!(
        two.players()
            .iter()
            .all(|p| p.wall_break == WallBreak::Unavailable)
    );
    let four = GameSession::new(GameConfig::new(4).unwrap()).unwrap();
    assert!(
        four.players()
            .iter()
            .all(|p| p.wall_break == WallBreak::Available)
    );
}

#[test]
fn test_break_wall_removes_placed_wall() {
    let mut session = three_player_action();
    play(&mut session, Seat::Red, cell(0, 0), cell(0, 0), Direction::East);
    assert!(session.board().is_walled(cell(0, 1), Direction::West));

    let events = session
        .break_wall(Seat::Blue, cell(0, 1), Direction::West)
        .unwrap();
    assert_eq!(
        events,
        vec![GameEvent::WallBroken {
            seat: Seat::Blue,
            cell: cell(0, 1),
            side: Direction::West
        }]
    );
    assert!(!session.board().is_walled(cell(0, 0), Direction::East));
    assert_eq!(session.current_seat(), Some(Seat::Blue));
    assert_eq!(*session.turn(), TurnState::AwaitingSelection);
    assert_eq!(session.players()[1].wall_break, WallBreak::Spent);

    // Blue still plays its turn normally.
    play(&mut session, Seat::Blue, cell(0, 6), cell(0, 6), Direction::South);
    assert_eq!(session.current_seat(), Some(Seat::Green));
}

#[test]
fn test_break_wall_only_once() {
    let mut session = three_player_action();
    play(&mut session, Seat::Red, cell(0, 0), cell(0, 0), Direction::East);
    play(&mut session, Seat::Blue, cell(0, 6), cell(0, 6), Direction::West);
    play(&mut session, Seat::Green, cell(6, 0), cell(6, 0), Direction::North);

    session
        .break_wall(Seat::Red, cell(0, 6), Direction::West)
        .unwrap();
    assert!(matches!(
        session.break_wall(Seat::Red, cell(0, 0), Direction::East),
        Err(GameError::InvalidCommand { .. })
    ));
    assert!(session.board().is_walled(cell(0, 0), Direction::East));
}

#[test]
fn test_break_wall_rejected_in_two_player_game() {
    let mut session = GameSession::new(GameConfig::default().with_rng_seed(1)).unwrap();
    for (seat, target) in [
        (Seat::Red, cell(0, 0)),
        (Seat::Blue, cell(0, 6)),
        (Seat::Blue, cell(6, 0)),
        (Seat::Red, cell(6, 6)),
    ] {
        session.place_piece(seat, target).unwrap();
    }
    play(&mut session, Seat::Red, cell(1, 1), cell(1, 1), Direction::East);

    assert!(matches!(
        session.break_wall(Seat::Blue, cell(1, 1), Direction::East),
        Err(GameError::InvalidCommand { .. })
    ));
}

#[test]
fn test_break_boundary_or_open_edge_is_illegal() {
    let mut session = three_player_action();
    assert!(matches!(
        session.break_wall(Seat::Red, cell(0, 3), Direction::North),
        Err(GameError::IllegalTarget(_))
    ));
    assert!(matches!(
        session.break_wall(Seat::Red, cell(3, 3), Direction::East),
        Err(GameError::IllegalTarget(_))
    ));
    assert_eq!(session.players()[0].wall_break, WallBreak::Available);
}

#[test]
fn test_break_wall_out_of_step_or_turn() {
    let mut session = three_player_action();
    play(&mut session, Seat::Red, cell(0, 0), cell(0, 0), Direction::East);

    assert!(matches!(
        session.break_wall(Seat::Green, cell(0, 0), Direction::East),
        Err(GameError::OutOfTurn { .. })
    ));
    session.select_piece(Seat::Blue, cell(0, 6)).unwrap();
    assert!(matches!(
        session.break_wall(Seat::Blue, cell(0, 0), Direction::East),
        Err(GameError::InvalidCommand { .. })
    ));
}

#[test]
fn test_sealed_seat_is_skipped() {
    let mut session = three_player_action();

    // Green walls itself into both corners while Red and Blue alternate
    // their two pieces down the middle.
    play(&mut session, Seat::Red, cell(0, 0), cell(1, 1), Direction::East);
    play(&mut session, Seat::Blue, cell(0, 6), cell(1, 5), Direction::West);
    play(&mut session, Seat::Green, cell(6, 0), cell(6, 0), Direction::North);

    play(&mut session, Seat::Red, cell(3, 0), cell(3, 2), Direction::North);
    play(&mut session, Seat::Blue, cell(3, 6), cell(3, 4), Direction::North);
    play(&mut session, Seat::Green, cell(6, 6), cell(6, 6), Direction::North);

    play(&mut session, Seat::Red, cell(1, 1), cell(2, 2), Direction::West);
    play(&mut session, Seat::Blue, cell(1, 5), cell(2, 4), Direction::East);
    play(&mut session, Seat::Green, cell(6, 0), cell(6, 0), Direction::East);

    play(&mut session, Seat::Red, cell(3, 2), cell(4, 2), Direction::South);
    play(&mut session, Seat::Blue, cell(3, 4), cell(4, 4), Direction::South);
    play(&mut session, Seat::Green, cell(6, 6), cell(6, 6), Direction::West);

    // Both Green pieces are sealed now.
    assert!(session.board().open_sides(cell(6, 0)).is_empty());
    assert!(session.board().open_sides(cell(6, 6)).is_empty());
    play(&mut session, Seat::Red, cell(2, 2), cell(2, 2), Direction::East);
    let events = play(&mut session, Seat::Blue, cell(2, 4), cell(2, 4), Direction::West);

    assert_eq!(session.phase(), Phase::Action);
    assert_eq!(events[1], GameEvent::SeatSkipped { seat: Seat::Green });
    assert!(matches!(
        events[2],
        GameEvent::TurnStarted {
            seat: Seat::Red,
            ..
        }
    ));
    assert_eq!(session.current_seat(), Some(Seat::Red));

    // Green's sealed piece is not Red's to select.
    assert!(matches!(
        session.select_piece(Seat::Red, cell(6, 0)),
        Err(GameError::IllegalTarget(_))
    ));
}

#[test]
fn test_rotation_holds_per_seat_in_three_player_game() {
    let mut session = three_player_action();
    play(&mut session, Seat::Red, cell(0, 0), cell(0, 1), Direction::South);
    play(&mut session, Seat::Blue, cell(0, 6), cell(0, 5), Direction::South);
    play(&mut session, Seat::Green, cell(6, 0), cell(6, 1), Direction::North);

    // Red's other piece is the only choice; Blue and Green keep their marks.
    assert_eq!(session.selectable_pieces().len(), 1);
    assert_eq!(session.acted_pieces().len(), 3);
    assert!(matches!(
        session.select_piece(Seat::Red, cell(0, 1)),
        Err(GameError::IllegalTarget(_))
    ));
    play(&mut session, Seat::Red, cell(3, 0), cell(3, 1), Direction::East);
    assert_eq!(session.acted_pieces().len(), 2);
}

#[test]
fn test_four_player_turn_order() {
    let mut session = GameSession::new(GameConfig::new(4).unwrap().with_rng_seed(2)).unwrap();
    let placements = [
        (Seat::Red, cell(0, 0)),
        (Seat::Blue, cell(0, 6)),
        (Seat::Green, cell(6, 0)),
        (Seat::Yellow, cell(6, 6)),
        (Seat::Yellow, cell(3, 4)),
        (Seat::Green, cell(3, 2)),
        (Seat::Blue, cell(2, 3)),
        (Seat::Red, cell(4, 3)),
    ];
    for (seat, target) in placements {
        session.place_piece(seat, target).unwrap();
    }

    play(&mut session, Seat::Red, cell(0, 0), cell(0, 1), Direction::South);
    play(&mut session, Seat::Blue, cell(0, 6), cell(1, 6), Direction::West);
    play(&mut session, Seat::Green, cell(6, 0), cell(5, 0), Direction::East);
    play(&mut session, Seat::Yellow, cell(6, 6), cell(6, 5), Direction::North);
    assert_eq!(session.current_seat(), Some(Seat::Red));
    assert_eq!(session.board().placed_walls().count(), 4);
}
