//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Cell, Player, WinLine};

/// Player and line for a single WinLine if it is complete.
fn completed_by(board: &Board, line: WinLine) -> Option<Player> {
    let [a, b, c] = line.cells();
    let cell = board.get(a)?;
    if cell != Cell::Empty && Some(cell) == board.get(b) && Some(cell) == board.get(c) {
        cell.player()
    } else {
        None
    }
}

/// First completed line in scan order.
///
/// Returns `Some((player, line))` if a player has three in a row,
/// `None` otherwise.
pub fn winning_line(board: &Board) -> Option<(Player, WinLine)> {
    WinLine::all().find_map(|line| completed_by(board, line).map(|player| (player, line)))
}

/// Every completed line on the board.
///
/// Legal play can complete two lines of the same mark at once; lines for
/// both marks together signal a corrupted board.
pub fn winning_lines(board: &Board) -> Vec<(Player, WinLine)> {
    WinLine::all()
        .filter_map(|line| completed_by(board, line).map(|player| (player, line)))
        .collect()
}
