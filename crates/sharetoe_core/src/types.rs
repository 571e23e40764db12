//! Core domain types for tic-tac-toe.

use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The cell this player's mark occupies.
    pub fn mark(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// A cell on the tic-tac-toe board.
///
/// Serialized as `""`, `"X"` or `"O"` so share tokens stay compatible with
/// links produced by the browser version of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    #[serde(rename = "")]
    Empty,
    /// Cell holding an X.
    X,
    /// Cell holding an O.
    O,
}

impl Cell {
    /// Returns the player owning this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    /// True for [`Cell::Empty`].
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// One of the eight winning arrangements.
///
/// Variant order is the scan order used by [`crate::rules::evaluate`]:
/// rows, then columns, then diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum WinLine {
    /// Cells 0, 1, 2.
    TopRow,
    /// Cells 3, 4, 5.
    MiddleRow,
    /// Cells 6, 7, 8.
    BottomRow,
    /// Cells 0, 3, 6.
    LeftColumn,
    /// Cells 1, 4, 7.
    CenterColumn,
    /// Cells 2, 5, 8.
    RightColumn,
    /// Cells 0, 4, 8.
    MainDiagonal,
    /// Cells 2, 4, 6.
    AntiDiagonal,
}

impl WinLine {
    /// Board indices covered by this line.
    pub fn cells(self) -> [usize; 3] {
        match self {
            WinLine::TopRow => [0, 1, 2],
            WinLine::MiddleRow => [3, 4, 5],
            WinLine::BottomRow => [6, 7, 8],
            WinLine::LeftColumn => [0, 3, 6],
            WinLine::CenterColumn => [1, 4, 7],
            WinLine::RightColumn => [2, 5, 8],
            WinLine::MainDiagonal => [0, 4, 8],
            WinLine::AntiDiagonal => [2, 4, 6],
        }
    }

    /// All lines in scan order.
    pub fn all() -> impl Iterator<Item = WinLine> {
        WinLine::iter()
    }

    /// True if the line passes through `index`.
    pub fn contains(self, index: usize) -> bool {
        self.cells().contains(&index)
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No line completed and empty cells remain.
    InProgress,
    /// A player completed a line.
    Win(Player, WinLine),
    /// Board full with no completed line.
    Draw,
}

impl GameOutcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win(player, _) => Some(*player),
            _ => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<WinLine> {
        match self {
            GameOutcome::Win(_, line) => Some(*line),
            _ => None,
        }
    }

    /// True once the round is decided.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win(player, _) => write!(f, "Player {} wins", player),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from raw cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if a cell exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Places a mark on an empty cell.
    pub fn place(&mut self, index: usize, player: Player) -> Result<(), BoardError> {
        match self.get(index) {
            None => Err(BoardError::OutOfRange(index)),
            Some(Cell::Empty) => {
                self.cells[index] = player.mark();
                Ok(())
            }
            Some(_) => Err(BoardError::Occupied(index)),
        }
    }

    /// Writes a mark without checking the target; for search scratch boards.
    pub(crate) fn put(&mut self, index: usize, player: Player) {
        self.cells[index] = player.mark();
    }

    /// Number of cells holding `player`'s mark.
    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| **c == player.mark()).count()
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }
}

/// Complete transportable game state.
///
/// Field names on the wire match the browser version's share links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Player to move.
    #[serde(rename = "currentPlayer")]
    current_player: Player,
    /// False once the round is decided.
    #[serde(rename = "gameActive")]
    active: bool,
}

impl GameState {
    /// Creates a fresh game with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            active: true,
        }
    }

    /// Assembles a state from parts, as read from a share token.
    pub fn from_parts(board: Board, current_player: Player, active: bool) -> Self {
        Self {
            board,
            current_player,
            active,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns whether moves are accepted.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Places the current player's mark (validated by the caller).
    pub(crate) fn place(&mut self, index: usize) -> Result<(), BoardError> {
        self.board.place(index, self.current_player)
    }

    /// Hands the turn to the other player.
    pub(crate) fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Stops accepting moves.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
