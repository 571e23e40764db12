//! Tuning knobs for a game session.

use crate::minimax::DEFAULT_DEPTH;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Search depth and the timings of deferred actions.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct SessionConfig {
    /// Plies the computer opponent searches.
    #[serde(default = "default_search_depth")]
    search_depth: u32,

    /// Seconds before the computer answers a move.
    #[serde(default = "default_computer_move_delay")]
    #[getter(skip)]
    computer_move_delay_secs: f64,

    /// Seconds a won board stays up before the automatic reset.
    #[serde(default = "default_win_reset_delay")]
    #[getter(skip)]
    win_reset_delay_secs: f64,

    /// Seconds a drawn board stays up before the automatic reset.
    #[serde(default = "default_draw_reset_delay")]
    #[getter(skip)]
    draw_reset_delay_secs: f64,
}

#[instrument]
fn default_search_depth() -> u32 {
    DEFAULT_DEPTH
}

#[instrument]
fn default_computer_move_delay() -> f64 {
    0.5
}

#[instrument]
fn default_win_reset_delay() -> f64 {
    1.5
}

#[instrument]
fn default_draw_reset_delay() -> f64 {
    2.0
}

/// Negative, NaN and overflowing values collapse to zero.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl SessionConfig {
    /// Delay before the computer's move fires.
    pub fn computer_move_delay(&self) -> Duration {
        seconds(self.computer_move_delay_secs)
    }

    /// Delay before a won board is cleared.
    pub fn win_reset_delay(&self) -> Duration {
        seconds(self.win_reset_delay_secs)
    }

    /// Delay before a drawn board is cleared.
    pub fn draw_reset_delay(&self) -> Duration {
        seconds(self.draw_reset_delay_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_depth: default_search_depth(),
            computer_move_delay_secs: default_computer_move_delay(),
            win_reset_delay_secs: default_win_reset_delay(),
            draw_reset_delay_secs: default_draw_reset_delay(),
        }
    }
}
