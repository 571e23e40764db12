//! End-to-end tests for game sessions driven through the public API.

use sharetoe_core::{
    Board, GameEvent, GameOutcome, GameSession, GameState, IgnoreReason, LaunchOptions, Minimax, MoveResult,
    OpponentMode, Phase, Player, SessionConfig, share_query,
};
use std::time::Duration;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_perfect_players_draw_and_board_resets() {
    let config = SessionConfig::default().with_search_depth(9);
    let mut session = GameSession::new(config);
    let human = Minimax::perfect();
    let start = session.generation();

    while session.phase() == Phase::AwaitingMove {
        let pick = human
            .best_move(session.state().board(), Player::X)
            .index()
            .expect("open board has a move");
        assert!(session.make_move(pick).is_applied());
        session.tick(ms(500));
    }

    assert_eq!(session.phase(), Phase::RoundOver(GameOutcome::Draw));
    assert_eq!(session.status(), "Game ended in a draw!");
    assert_eq!(session.scores().human(), 0);
    assert_eq!(session.scores().computer(), 0);

    session.tick(ms(2000));
    assert_eq!(session.phase(), Phase::AwaitingMove);
    assert_eq!(session.state().board(), &Board::new());
    assert!(session.generation() > start);
    assert_eq!(session.status(), "Playing with Computer.");
}

#[test]
fn test_shared_state_with_o_to_move_gets_computer_reply() {
    let mut board = Board::new();
    board.place(4, Player::X).unwrap();
    let state = GameState::from_parts(board, Player::O, true);
    let link = format!("https://play.example/?{}", share_query(&state).unwrap());

    let mut session = GameSession::launch(SessionConfig::default(), &LaunchOptions::from_link(&link));
    assert_eq!(session.mode(), OpponentMode::Computer);
    assert_eq!(session.status(), "Computer's turn");
    assert_eq!(
        session.make_move(0),
        MoveResult::Ignored(IgnoreReason::ComputerTurn)
    );

    session.tick(ms(500));
    assert_eq!(session.state().board().count(Player::O), 1);
    assert_eq!(session.state().current_player(), Player::X);
    assert_eq!(session.status(), "Your turn!");
}

#[test]
fn test_invite_link_joins_as_o() {
    let mut board = Board::new();
    board.place(0, Player::X).unwrap();
    let state = GameState::from_parts(board, Player::O, true);
    let query = format!("{}&invite=1", share_query(&state).unwrap());

    let mut session = GameSession::launch(SessionConfig::default(), &LaunchOptions::from_query(&query));
    assert_eq!(session.mode(), OpponentMode::Human);
    assert_eq!(session.local_player(), Player::O);
    assert_eq!(session.status(), "Your turn!");
    assert!(session.next_due().is_none());

    session.drain_events();
    assert!(session.make_move(4).is_applied());
    assert_eq!(session.status(), "Player X's turn");

    let shared: Vec<String> = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::ShareUpdated(query) => Some(query),
            _ => None,
        })
        .collect();
    assert_eq!(shared, vec![session.share_query().unwrap()]);
}

#[test]
fn test_shared_finished_game_is_not_scored() {
    let mut board = Board::new();
    for (index, player) in [(0, Player::X), (3, Player::O), (1, Player::X), (4, Player::O), (2, Player::X)] {
        board.place(index, player).unwrap();
    }
    let state = GameState::from_parts(board, Player::O, true);

    let mut session = GameSession::default();
    session.import_state(state);
    assert_eq!(session.status(), "Player X has won!");
    assert!(!session.state().is_active());
    assert_eq!(session.scores().human(), 0);

    session.tick(ms(1500));
    assert_eq!(session.phase(), Phase::AwaitingMove);
    assert_eq!(session.state(), &GameState::new());
}

#[test]
fn test_moves_after_a_win_are_ignored_until_reset() {
    let mut session = GameSession::default();
    session.select_opponent_mode(OpponentMode::Human);
    for index in [0, 3, 1, 4, 2] {
        assert!(session.make_move(index).is_applied());
    }
    assert_eq!(session.scores().human(), 1);
    assert_eq!(
        session.make_move(8),
        MoveResult::Ignored(IgnoreReason::Inactive)
    );

    session.reset();
    assert!(session.make_move(8).is_applied());
    assert_eq!(session.scores().human(), 1);
}
