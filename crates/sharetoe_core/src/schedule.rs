//! Deferred tasks on a virtual clock.
//!
//! The session never sleeps. It schedules follow-up work (the computer's
//! reply, the automatic reset after a round) here, and the owner advances
//! the clock with [`crate::GameSession::tick`]. Every task remembers the
//! session [`Generation`] it was scheduled in; a reset moves the session to
//! a new generation and older tasks are discarded when they come due.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Counter bumped on every reset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Work that can be deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Let the computer pick and play its move.
    ComputerMove,
    /// Clear the board after a decided round.
    AutoReset,
}

/// A task waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    kind: TaskKind,
    generation: Generation,
    due: Duration,
    seq: u64,
}

impl ScheduledTask {
    /// What to do.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Generation the task was scheduled in.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn order(&self) -> (Duration, u64) {
        (self.due, self.seq)
    }
}

/// Pending tasks ordered by due time, then by scheduling order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `kind` to fire `delay` from now.
    pub fn schedule(
        &mut self,
        kind: TaskKind,
        delay: Duration,
        generation: Generation,
    ) -> ScheduledTask {
        let task = ScheduledTask {
            kind,
            generation,
            due: self.now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        trace!(?kind, %generation, due = ?task.due, "Task scheduled");
        self.pending.push(task);
        task
    }

    /// Time from now until the earliest task fires.
    pub fn until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(ScheduledTask::order)
            .min()
            .map(|(due, _)| due.saturating_sub(self.now))
    }

    /// Removes and returns the earliest task due at or before `deadline`.
    ///
    /// The clock moves to the task's due time, so anything the task
    /// schedules is timed from when it fired.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<ScheduledTask> {
        let (slot, task) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= deadline)
            .min_by_key(|(_, task)| task.order())
            .map(|(slot, task)| (slot, *task))?;
        self.pending.remove(slot);
        self.now = self.now.max(task.due);
        Some(task)
    }

    /// Moves the clock forward to `deadline` without firing anything.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Drops tasks from generations other than `current`.
    pub fn discard_stale(&mut self, current: Generation) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| task.generation == current);
        before - self.pending.len()
    }
}
