//! First-class invariants for tic-tac-toe states.
//!
//! Legal play never breaks these. They guard states that arrive from outside
//! (share tokens) and every state the session produces.

use crate::error::LogicFault;
use crate::rules::winning_lines;
use crate::types::{GameState, Player};
use tracing::instrument;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples so sets compose by type.
pub trait InvariantSet<S> {
    /// Checks all invariants, collecting the descriptions of those that fail.
    fn check_all(state: &S) -> Result<(), Vec<&'static str>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<&'static str>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(I1::description());
        }
        if !I2::holds(state) {
            violations.push(I2::description());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<&'static str>> {
        let mut violations = match <(I1, I2)>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(violations) => violations,
        };
        if !I3::holds(state) {
            violations.push(I3::description());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// At most one mark holds a completed line.
pub struct SingleWinnerInvariant;

impl Invariant<GameState> for SingleWinnerInvariant {
    fn holds(state: &GameState) -> bool {
        let lines = winning_lines(state.board());
        let x = lines.iter().any(|(p, _)| *p == Player::X);
        let o = lines.iter().any(|(p, _)| *p == Player::O);
        !(x && o)
    }

    fn description() -> &'static str {
        "At most one player holds a completed line"
    }
}

/// X moves first, so X has as many marks as O or exactly one more.
pub struct MarkBalanceInvariant;

impl Invariant<GameState> for MarkBalanceInvariant {
    fn holds(state: &GameState) -> bool {
        let x = state.board().count(Player::X);
        let o = state.board().count(Player::O);
        x == o || x == o + 1
    }

    fn description() -> &'static str {
        "X has as many marks as O or one more"
    }
}

/// While a round is active, the player to move follows from the mark counts.
pub struct TurnOrderInvariant;

impl Invariant<GameState> for TurnOrderInvariant {
    fn holds(state: &GameState) -> bool {
        if !state.is_active() {
            return true;
        }
        let x = state.board().count(Player::X);
        let o = state.board().count(Player::O);
        let expected = if x == o { Player::X } else { Player::O };
        state.current_player() == expected
    }

    fn description() -> &'static str {
        "Player to move matches the marks on the board"
    }
}

/// All game-state invariants as a composable set.
pub type GameStateInvariants = (
    SingleWinnerInvariant,
    MarkBalanceInvariant,
    TurnOrderInvariant,
);

/// Checks every game-state invariant, folding failures into one fault.
#[track_caller]
#[instrument(level = "trace")]
pub fn check_state(state: &GameState) -> Result<(), LogicFault> {
    GameStateInvariants::check_all(state)
        .map_err(|violations| LogicFault::new(violations.join("; ")))
}
