//! Tic-tac-toe game core.
//!
//! Pure game logic with no rendering or I/O:
//!
//! - **Board model**: [`Board`], [`GameState`] and the rules in [`rules`]
//! - **Minimax engine**: [`Minimax`], a depth-limited search
//! - **State machine**: [`GameSession`], which sequences turns, keeps score,
//!   drives the computer opponent and resets finished rounds
//! - **Share links**: [`encode_token`], [`decode_token`] and [`LaunchOptions`]
//!
//! # Example
//!
//! ```
//! use sharetoe_core::{GameSession, SessionConfig};
//! use std::time::Duration;
//!
//! let mut session = GameSession::new(SessionConfig::default());
//! session.make_move(4);
//! session.tick(Duration::from_millis(500));
//! assert_eq!(session.state().board().count(sharetoe_core::Player::O), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod invariants;
mod minimax;
mod position;
pub mod rules;
mod schedule;
mod session;
mod share;
mod types;

pub use config::SessionConfig;
pub use error::{BoardError, LogicFault, TokenError};
pub use minimax::{DEFAULT_DEPTH, MAX_DEPTH, Minimax, SearchResult, WIN_SCORE};
pub use position::Position;
pub use rules::{apply, evaluate, legal_moves};
pub use schedule::{Generation, ScheduledTask, Scheduler, TaskKind};
pub use session::{
    COMPUTER_MARK, GameEvent, GameSession, HUMAN_MARK, IgnoreReason, MoveResult, OpponentMode,
    Phase, ScoreBoard, Snapshot,
};
pub use share::{
    INVITE_PARAM, LaunchOptions, STATE_PARAM, decode_token, encode_token, share_query,
};
pub use types::{Board, CELL_COUNT, Cell, GameOutcome, GameState, Player, WinLine};
