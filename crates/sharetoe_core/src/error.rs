//! Error types for the game core.

use derive_more::{Display, Error};
use tracing::instrument;

/// Rejected board placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Index outside 0-8.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),
    /// Cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] usize),
}

/// Share token could not be decoded.
#[derive(Debug, Clone, Display, Error)]
#[display("Token error: {} at {}:{}", message, file, line)]
pub struct TokenError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TokenError {
    /// Creates a new token error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<base64::DecodeError> for TokenError {
    #[track_caller]
    fn from(err: base64::DecodeError) -> Self {
        Self::new(format!("Base64 error: {}", err))
    }
}

impl From<serde_json::Error> for TokenError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for TokenError {
    #[track_caller]
    fn from(err: url::ParseError) -> Self {
        Self::new(format!("URL error: {}", err))
    }
}

/// A game invariant was broken.
///
/// These never arise from legal play. They are reported to the view layer
/// rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Logic fault: {} at {}:{}", description, file, line)]
pub struct LogicFault {
    /// What was violated.
    pub description: String,
    /// Line number where the fault was detected.
    pub line: u32,
    /// Source file where the fault was detected.
    pub file: &'static str,
}

impl LogicFault {
    /// Creates a new fault with caller location tracking.
    #[track_caller]
    #[instrument(skip(description))]
    pub fn new(description: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            description: description.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
