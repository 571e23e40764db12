//! Tests for the interactive terminal loop.

use sharetoe::run;
use sharetoe_core::{GameSession, SessionConfig};

fn instant_config() -> SessionConfig {
    SessionConfig::default()
        .with_computer_move_delay_secs(0.0)
        .with_win_reset_delay_secs(0.0)
        .with_draw_reset_delay_secs(0.0)
}

async fn play(session: &mut GameSession, script: &str) -> String {
    let mut output = Vec::new();
    run(session, script.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_computer_answers_before_next_command() {
    let mut session = GameSession::new(instant_config());
    let screen = play(&mut session, "center\nquit\n").await;

    assert!(screen.contains("Playing with Computer."));
    assert!(screen.contains(" O | 1 | 2 "));
    assert!(screen.contains("Your turn!"));
    assert_eq!(session.state().board().count(sharetoe_core::Player::O), 1);
}

#[tokio::test]
async fn test_two_player_win_resets_after_input_ends() {
    let mut session = GameSession::new(instant_config());
    let screen = play(&mut session, "invite\n0\n3\n1\n4\n2\n").await;

    assert!(screen.contains("Share: ?state="));
    assert!(screen.contains("Player X has won!"));
    assert!(screen.contains("[X]|[X]|[X]"));
    assert!(screen.contains("You: 1"));
    assert_eq!(session.scores().human(), 1);
    assert!(session.state().board().cells().iter().all(|cell| cell.is_empty()));
}

#[tokio::test]
async fn test_bad_input_is_reported() {
    let mut session = GameSession::new(instant_config());
    let screen = play(&mut session, "dance\n4\n4\nquit\n").await;

    assert!(screen.contains("Unknown command: dance"));
    assert!(screen.contains("Move ignored: Occupied"));
}
