//! Plain-text rendering of game snapshots.

use sharetoe_core::{Cell, OpponentMode, Player, Snapshot};

/// Draws snapshots as a small text board with a status line and scores.
///
/// Cells on a winning line are bracketed, empty cells show their index.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalView;

impl TerminalView {
    /// Creates a view.
    pub fn new() -> Self {
        Self
    }

    /// Full screen for one snapshot.
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        out.push_str(&self.board(snapshot));
        out.push_str("\n\n");
        out.push_str(&snapshot.status);
        out.push('\n');
        out.push_str(&self.scores(snapshot));
        out.push('\n');
        out
    }

    /// The 3x3 grid.
    pub fn board(&self, snapshot: &Snapshot) -> String {
        let highlight = |index: usize| {
            snapshot
                .winning_line
                .is_some_and(|line| line.contains(index))
        };

        let mut rows = Vec::with_capacity(3);
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    let index = row * 3 + col;
                    let symbol = match snapshot.board.get(index) {
                        Some(Cell::X) => "X".to_string(),
                        Some(Cell::O) => "O".to_string(),
                        _ => index.to_string(),
                    };
                    if highlight(index) {
                        format!("[{}]", symbol)
                    } else {
                        format!(" {} ", symbol)
                    }
                })
                .collect();
            rows.push(cells.join("|"));
        }
        rows.join("\n---+---+---\n")
    }

    /// Score line; labels depend on who is playing.
    pub fn scores(&self, snapshot: &Snapshot) -> String {
        match (snapshot.mode, snapshot.local_player) {
            (OpponentMode::Computer, _) => format!(
                "User: {}  Computer: {}",
                snapshot.scores.human(),
                snapshot.scores.computer()
            ),
            (OpponentMode::Human, Player::X) => format!("You: {}", snapshot.scores.human()),
            (OpponentMode::Human, Player::O) => format!("User 2: {}", snapshot.scores.human()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharetoe_core::{GameSession, OpponentMode};

    #[test]
    fn test_fresh_board_shows_indices() {
        let session = GameSession::default();
        let view = TerminalView::new();
        assert_eq!(
            view.board(&session.snapshot()),
            " 0 | 1 | 2 \n---+---+---\n 3 | 4 | 5 \n---+---+---\n 6 | 7 | 8 "
        );
    }

    #[test]
    fn test_winning_line_is_bracketed() {
        let mut session = GameSession::default();
        session.select_opponent_mode(OpponentMode::Human);
        for index in [0, 3, 1, 4, 2] {
            session.make_move(index);
        }
        let board = TerminalView::new().board(&session.snapshot());
        assert!(board.starts_with("[X]|[X]|[X]"));
        assert!(board.contains(" O | O | 5 "));
    }

    #[test]
    fn test_score_labels() {
        let mut session = GameSession::default();
        let view = TerminalView::new();
        assert_eq!(view.scores(&session.snapshot()), "User: 0  Computer: 0");
        session.select_opponent_mode(OpponentMode::Human);
        assert_eq!(view.scores(&session.snapshot()), "You: 0");
    }
}
