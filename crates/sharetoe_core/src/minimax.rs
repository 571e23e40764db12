//! Depth-limited minimax search.
//!
//! Terminal positions score absolutely: a win for the maximising mark is
//! [`WIN_SCORE`], a loss is `-WIN_SCORE`, a draw is zero. Scores are not
//! weighted by depth, so a slow win ranks the same as a fast one. Positions
//! still open when the depth budget runs out score zero.

use crate::rules::{evaluate, legal_moves};
use crate::types::{Board, GameOutcome, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Score of a won position for the maximising mark.
pub const WIN_SCORE: i32 = 10;

/// Plies searched by the standard computer opponent.
pub const DEFAULT_DEPTH: u32 = 2;

/// Deepest useful search; a game never lasts more than nine plies.
pub const MAX_DEPTH: u32 = 9;

/// Move recommendation and its minimax score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    index: Option<usize>,
    score: i32,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self { index: None, score }
    }

    /// Recommended cell, `None` for terminal positions or an exhausted depth.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Minimax score from the maximising mark's point of view.
    pub fn score(&self) -> i32 {
        self.score
    }
}

/// Minimax engine with a fixed depth budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minimax {
    depth: u32,
}

impl Minimax {
    /// Creates an engine searching `depth` plies (clamped to [`MAX_DEPTH`]).
    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.min(MAX_DEPTH),
        }
    }

    /// Engine that searches every line to the end of the game.
    pub fn perfect() -> Self {
        Self::new(MAX_DEPTH)
    }

    /// Depth budget in plies.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Searches for `to_move`, scoring from `maximizer`'s point of view.
    ///
    /// The first move in ascending index order reaching the best score is
    /// kept. `board` is never modified.
    #[instrument(skip(self, board), fields(depth = self.depth))]
    pub fn search(&self, board: &Board, to_move: Player, maximizer: Player) -> SearchResult {
        let result = minimax(*board, to_move, maximizer, self.depth);
        debug!(index = ?result.index, score = result.score, "Search complete");
        result
    }

    /// Best move for `player`, maximising its own score.
    pub fn best_move(&self, board: &Board, player: Player) -> SearchResult {
        self.search(board, player, player)
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

fn minimax(board: Board, mover: Player, maximizer: Player, depth: u32) -> SearchResult {
    match evaluate(&board) {
        GameOutcome::Win(winner, _) if winner == maximizer => return SearchResult::leaf(WIN_SCORE),
        GameOutcome::Win(_, _) => return SearchResult::leaf(-WIN_SCORE),
        GameOutcome::Draw => return SearchResult::leaf(0),
        GameOutcome::InProgress => {}
    }
    if depth == 0 {
        return SearchResult::leaf(0);
    }

    let maximizing = mover == maximizer;
    let mut best: Option<SearchResult> = None;

    for index in legal_moves(&board) {
        let mut scratch = board;
        scratch.put(index, mover);
        let score = minimax(scratch, mover.opponent(), maximizer, depth - 1).score;

        let improves = match best {
            None => true,
            Some(current) if maximizing => score > current.score,
            Some(current) => score < current.score,
        };
        if improves {
            best = Some(SearchResult {
                index: Some(index),
                score,
            });
        }
    }

    best.unwrap_or(SearchResult::leaf(0))
}
