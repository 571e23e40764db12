//! Game rules for tic-tac-toe.
//!
//! Pure functions over [`Board`]. Rules are separated from board storage
//! so both the session and the search engine can share them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{winning_line, winning_lines};

use crate::error::BoardError;
use crate::types::{Board, GameOutcome, Player, CELL_COUNT};
use tracing::instrument;

/// Evaluates a board.
///
/// The first completed line in scan order wins, even on a full board.
#[instrument(level = "trace")]
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some((player, line)) = winning_line(board) {
        return GameOutcome::Win(player, line);
    }
    if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

/// Indices of empty cells, ascending.
pub fn legal_moves(board: &Board) -> Vec<usize> {
    (0..CELL_COUNT).filter(|&i| board.is_empty(i)).collect()
}

/// Returns a copy of `board` with `player`'s mark at `index`.
pub fn apply(board: &Board, index: usize, player: Player) -> Result<Board, BoardError> {
    let mut next = *board;
    next.place(index, player)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, WinLine};

    fn board(cells: &str) -> Board {
        let mut parsed = [Cell::Empty; CELL_COUNT];
        for (i, ch) in cells.chars().enumerate() {
            parsed[i] = match ch {
                'X' => Cell::X,
                'O' => Cell::O,
                _ => Cell::Empty,
            };
        }
        Board::from_cells(parsed)
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), GameOutcome::InProgress);
    }

    #[test]
    fn test_top_row_win_after_apply() {
        let before = board("XX.OO....");
        let after = apply(&before, 2, Player::X).unwrap();
        assert_eq!(evaluate(&after), GameOutcome::Win(Player::X, WinLine::TopRow));
        assert_eq!(WinLine::TopRow.cells(), [0, 1, 2]);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        assert_eq!(evaluate(&board("XOXXOOOXX")), GameOutcome::Draw);
    }

    #[test]
    fn test_full_board_with_line_reports_win() {
        // X completes the main diagonal on the last move.
        assert_eq!(
            evaluate(&board("XOXOXOOXX")),
            GameOutcome::Win(Player::X, WinLine::MainDiagonal)
        );
    }

    #[test]
    fn test_double_winner_board_reports_first_line() {
        // Not reachable in play, must not panic.
        assert_eq!(
            evaluate(&board("XXXOOO...")),
            GameOutcome::Win(Player::X, WinLine::TopRow)
        );
    }

    #[test]
    fn test_legal_moves_ascending() {
        assert_eq!(legal_moves(&board("X...O...X")), vec![1, 2, 3, 5, 6, 7]);
        assert!(legal_moves(&board("XOXXOOOXX")).is_empty());
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let before = board("X........");
        let after = apply(&before, 4, Player::O).unwrap();
        assert_eq!(before.get(4), Some(Cell::Empty));
        assert_eq!(after.get(4), Some(Cell::O));
        assert_eq!(apply(&after, 0, Player::O), Err(BoardError::Occupied(0)));
    }
}
