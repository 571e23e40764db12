//! Sharetoe - terminal front end for the tic-tac-toe core.
//!
//! The game rules, minimax opponent and session state machine live in
//! [`sharetoe_core`]. This crate adds what a player touches:
//!
//! - **Config**: [`AppConfig`], read from a TOML file
//! - **View**: [`TerminalView`], which draws session snapshots as text
//! - **Runner**: [`run`], the interactive loop driving a session from a
//!   line-based input and the tokio clock
//!
//! # Example
//!
//! ```
//! use sharetoe::{AppConfig, TerminalView};
//! use sharetoe_core::GameSession;
//!
//! let config = AppConfig::default();
//! let session = GameSession::new(config.session().clone());
//! let screen = TerminalView::new().render(&session.snapshot());
//! assert!(screen.contains("Playing with Computer."));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod runner;
mod terminal;

pub use config::{AppConfig, ConfigError};
pub use runner::{Command, run};
pub use terminal::TerminalView;
