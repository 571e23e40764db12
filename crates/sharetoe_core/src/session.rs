//! The game state machine.
//!
//! A [`GameSession`] owns the board, the score and the opponent mode. Inputs
//! arrive as method calls ([`GameSession::make_move`],
//! [`GameSession::select_opponent_mode`]); outputs leave as [`GameEvent`]s
//! that a view drains with [`GameSession::drain_events`]. Deferred work runs
//! when the owner calls [`GameSession::tick`].

use crate::config::SessionConfig;
use crate::error::{LogicFault, TokenError};
use crate::invariants::check_state;
use crate::minimax::Minimax;
use crate::rules::{evaluate, legal_moves};
use crate::schedule::{Generation, ScheduledTask, Scheduler, TaskKind};
use crate::share::{LaunchOptions, encode_token, share_query};
use crate::types::{Board, GameOutcome, GameState, Player, WinLine, CELL_COUNT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// The mark played by whoever starts the game (and the computer's opponent).
pub const HUMAN_MARK: Player = Player::X;

/// The mark played by the computer.
pub const COMPUTER_MARK: Player = Player::O;

/// Who controls O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum OpponentMode {
    /// Another person plays O, through a shared link.
    Human,
    /// The minimax engine plays O.
    Computer,
}

/// Where the state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to move.
    AwaitingMove,
    /// A move was placed and the board is being evaluated.
    Evaluating,
    /// The round is decided; an automatic reset is scheduled.
    RoundOver(GameOutcome),
}

/// Wins per side, kept across resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    human: u32,
    computer: u32,
}

impl ScoreBoard {
    /// Rounds won by X.
    pub fn human(&self) -> u32 {
        self.human
    }

    /// Rounds won by the computer.
    pub fn computer(&self) -> u32 {
        self.computer
    }

    /// Credits a decided round. Returns false when nothing was counted.
    fn record(&mut self, winner: Player, mode: OpponentMode) -> bool {
        match (winner, mode) {
            (HUMAN_MARK, _) => {
                self.human += 1;
                true
            }
            (COMPUTER_MARK, OpponentMode::Computer) => {
                self.computer += 1;
                true
            }
            _ => false,
        }
    }
}

/// Why a move was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum IgnoreReason {
    /// Index outside 0-8.
    OutOfRange,
    /// Cell already holds a mark.
    Occupied,
    /// The round is over.
    Inactive,
    /// The session is not waiting for a move.
    NotAwaitingMove,
    /// The computer is about to move.
    ComputerTurn,
}

/// What happened to a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Placed; the board now evaluates to this outcome.
    Applied(GameOutcome),
    /// Dropped without touching the state.
    Ignored(IgnoreReason),
}

impl MoveResult {
    /// True if the move was placed.
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied(_))
    }
}

/// Everything a view needs to redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current board.
    pub board: Board,
    /// Board evaluation.
    pub outcome: GameOutcome,
    /// Line to highlight, if the round was won.
    pub winning_line: Option<WinLine>,
    /// Player to move.
    pub current_player: Player,
    /// Whether moves are accepted.
    pub active: bool,
    /// State machine phase.
    pub phase: Phase,
    /// Who plays O.
    pub mode: OpponentMode,
    /// Mark of the person at this screen.
    pub local_player: Player,
    /// Win counters.
    pub scores: ScoreBoard,
    /// One-line status text.
    pub status: String,
    /// Reset counter.
    pub generation: Generation,
}

/// Notification for the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The state changed; redraw from the snapshot.
    Updated(Snapshot),
    /// The shareable link changed.
    ShareUpdated(String),
    /// An invariant was violated.
    Fault(LogicFault),
}

/// One game table: board, score, opponent and pending timers.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    phase: Phase,
    mode: OpponentMode,
    local_player: Player,
    scores: ScoreBoard,
    status: String,
    engine: Minimax,
    config: SessionConfig,
    generation: Generation,
    scheduler: Scheduler,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates a session against the computer.
    #[instrument(skip(config))]
    pub fn new(config: SessionConfig) -> Self {
        let engine = Minimax::new(*config.search_depth());
        info!(depth = engine.depth(), "Creating game session");
        let mut session = Self {
            state: GameState::new(),
            phase: Phase::AwaitingMove,
            mode: OpponentMode::Computer,
            local_player: HUMAN_MARK,
            scores: ScoreBoard::default(),
            status: String::new(),
            engine,
            config,
            generation: Generation::default(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
        };
        session.reset();
        session
    }

    /// Creates a session as described by a shared link.
    ///
    /// The mode is applied first, then the shared state (if any) is loaded
    /// over the fresh board.
    #[instrument(
        skip(config, options),
        fields(invite = options.invite(), has_state = options.state().is_some())
    )]
    pub fn launch(config: SessionConfig, options: &LaunchOptions) -> Self {
        let mut session = Self::new(config);
        if options.invite() {
            session.mode = OpponentMode::Human;
            session.local_player = COMPUTER_MARK;
            session.reset();
            session.status =
                "You are playing against another player. Share this link with your friend."
                    .to_string();
            session.publish();
        }
        if let Some(state) = options.state() {
            session.import_state(*state);
        }
        session
    }

    // ─────────────────────────────────────────────────────────────
    //  Inputs
    // ─────────────────────────────────────────────────────────────

    /// Places the current player's mark at `index`.
    ///
    /// Moves on occupied or out-of-range cells, outside `AwaitingMove`, and
    /// (against the computer) on the computer's turn are ignored.
    #[instrument(
        skip(self),
        fields(player = %self.state.current_player(), generation = %self.generation)
    )]
    pub fn make_move(&mut self, index: usize) -> MoveResult {
        if self.mode == OpponentMode::Computer
            && self.state.current_player() == COMPUTER_MARK
            && self.phase == Phase::AwaitingMove
        {
            debug!("Ignoring move on the computer's turn");
            return MoveResult::Ignored(IgnoreReason::ComputerTurn);
        }
        self.play(index)
    }

    /// Switches who plays O and starts a fresh round.
    #[instrument(skip(self))]
    pub fn select_opponent_mode(&mut self, mode: OpponentMode) {
        info!(from = %self.mode, to = %mode, "Switching opponent mode");
        self.mode = mode;
        self.local_player = HUMAN_MARK;
        self.reset();
        if mode == OpponentMode::Human {
            self.status =
                "Playing against another player. Share this link with your friend.".to_string();
            self.publish();
        }
    }

    /// Clears the board for a new round, keeping scores and mode.
    ///
    /// Deferred tasks from before the reset become no-ops. X always moves
    /// first, so the computer never moves straight after a reset.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        let dropped = self.scheduler.discard_stale(self.generation);
        self.state = GameState::new();
        self.phase = Phase::AwaitingMove;
        self.status = match self.mode {
            OpponentMode::Computer => "Playing with Computer.".to_string(),
            OpponentMode::Human => "Playing against another player.".to_string(),
        };
        info!(generation = %self.generation, dropped, mode = %self.mode, "Board reset");
        self.publish();
        self.publish_share();
    }

    /// Loads a shared state, replacing the current round.
    ///
    /// The active flag is normalized first: a decided board is inactive, an
    /// open one is active. States that then break an invariant are rejected
    /// with a [`GameEvent::Fault`] and the board is reset. Either way,
    /// deferred tasks from the replaced round are dropped. A decided board
    /// enters `RoundOver` without touching the score.
    #[instrument(skip(self, state))]
    pub fn import_state(&mut self, state: GameState) {
        let outcome = evaluate(state.board());
        let mut state = state;
        if outcome.is_over() {
            state.deactivate();
        } else if !state.is_active() {
            debug!("Shared state marked inactive mid-round, reactivating");
            state = GameState::from_parts(*state.board(), state.current_player(), true);
        }

        if let Err(fault) = check_state(&state) {
            self.report_fault(fault);
            warn!("Rejected shared state, starting a fresh board");
            self.reset();
            return;
        }

        self.generation = self.generation.next();
        let dropped = self.scheduler.discard_stale(self.generation);
        self.state = state;
        info!(%outcome, to_move = %state.current_player(), dropped, "Imported shared state");

        match outcome {
            GameOutcome::InProgress => {
                self.phase = Phase::AwaitingMove;
                self.status = self.turn_status();
                if self.computer_to_move() {
                    self.schedule(TaskKind::ComputerMove, self.config.computer_move_delay());
                }
                self.publish();
            }
            decided => self.finish_round(decided, false),
        }
    }

    /// Advances the clock by `elapsed`, running every task that comes due.
    ///
    /// Tasks scheduled before the latest reset are skipped.
    #[instrument(skip(self))]
    pub fn tick(&mut self, elapsed: Duration) {
        let deadline = self.scheduler.now() + elapsed;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run(task);
        }
        self.scheduler.advance_to(deadline);
    }

    // ─────────────────────────────────────────────────────────────
    //  Outputs
    // ─────────────────────────────────────────────────────────────

    /// Takes all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current view of the session.
    pub fn snapshot(&self) -> Snapshot {
        let outcome = evaluate(self.state.board());
        Snapshot {
            board: *self.state.board(),
            outcome,
            winning_line: outcome.line(),
            current_player: self.state.current_player(),
            active: self.state.is_active(),
            phase: self.phase,
            mode: self.mode,
            local_player: self.local_player,
            scores: self.scores,
            status: self.status.clone(),
            generation: self.generation,
        }
    }

    /// Share token for the current state.
    pub fn share_token(&self) -> Result<String, TokenError> {
        encode_token(&self.state)
    }

    /// Query string for the current state.
    pub fn share_query(&self) -> Result<String, TokenError> {
        share_query(&self.state)
    }

    /// Time until the next deferred task fires.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.until_next()
    }

    /// Transportable game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// State machine phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Who plays O.
    pub fn mode(&self) -> OpponentMode {
        self.mode
    }

    /// Mark of the person at this screen.
    pub fn local_player(&self) -> Player {
        self.local_player
    }

    /// Win counters.
    pub fn scores(&self) -> ScoreBoard {
        self.scores
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Reset counter.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Session tuning.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The computer's search engine.
    pub fn engine(&self) -> &Minimax {
        &self.engine
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    fn play(&mut self, index: usize) -> MoveResult {
        let reason = if index >= CELL_COUNT {
            Some(IgnoreReason::OutOfRange)
        } else if !self.state.is_active() {
            Some(IgnoreReason::Inactive)
        } else if self.phase != Phase::AwaitingMove {
            Some(IgnoreReason::NotAwaitingMove)
        } else if !self.state.board().is_empty(index) {
            Some(IgnoreReason::Occupied)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(index, %reason, "Ignoring move");
            return MoveResult::Ignored(reason);
        }

        let player = self.state.current_player();
        if let Err(e) = self.state.place(index) {
            // Guarded above; reaching here means the checks and the board disagree.
            self.report_fault(LogicFault::new(e.to_string()));
            return MoveResult::Ignored(IgnoreReason::Occupied);
        }
        debug!(index, %player, "Move placed");

        self.phase = Phase::Evaluating;
        let outcome = evaluate(self.state.board());
        match outcome {
            GameOutcome::InProgress => {
                self.state.pass_turn();
                self.phase = Phase::AwaitingMove;
                self.status = self.turn_status();
                if let Err(fault) = check_state(&self.state) {
                    self.report_fault(fault);
                }
                if self.computer_to_move() {
                    self.schedule(TaskKind::ComputerMove, self.config.computer_move_delay());
                }
                self.publish();
                if self.mode == OpponentMode::Human {
                    self.publish_share();
                }
            }
            decided => self.finish_round(decided, true),
        }
        MoveResult::Applied(outcome)
    }

    fn finish_round(&mut self, outcome: GameOutcome, award: bool) {
        self.state.deactivate();
        self.phase = Phase::RoundOver(outcome);
        if let Err(fault) = check_state(&self.state) {
            self.report_fault(fault);
        }

        let delay = match outcome {
            GameOutcome::Win(winner, line) => {
                self.status = format!("Player {} has won!", winner);
                let counted = award && self.scores.record(winner, self.mode);
                info!(
                    %winner,
                    ?line,
                    counted,
                    human = self.scores.human,
                    computer = self.scores.computer,
                    "Round won"
                );
                self.config.win_reset_delay()
            }
            _ => {
                self.status = "Game ended in a draw!".to_string();
                info!("Round drawn");
                self.config.draw_reset_delay()
            }
        };
        self.schedule(TaskKind::AutoReset, delay);
        self.publish();
        if self.mode == OpponentMode::Human {
            self.publish_share();
        }
    }

    fn run(&mut self, task: ScheduledTask) {
        if task.generation() != self.generation {
            debug!(
                kind = ?task.kind(),
                task_generation = %task.generation(),
                generation = %self.generation,
                "Skipping stale task"
            );
            return;
        }
        match task.kind() {
            TaskKind::ComputerMove => self.computer_move(),
            TaskKind::AutoReset => self.reset(),
        }
    }

    #[instrument(skip(self), fields(generation = %self.generation))]
    fn computer_move(&mut self) {
        if !self.computer_to_move() || self.phase != Phase::AwaitingMove {
            debug!("Computer move no longer applicable");
            return;
        }
        let board = *self.state.board();
        let result = self.engine.best_move(&board, COMPUTER_MARK);
        let index = match result.index() {
            Some(index) => index,
            None => match legal_moves(&board).first() {
                Some(&index) => {
                    warn!(
                        depth = self.engine.depth(),
                        index,
                        "Search returned no move, playing first open cell"
                    );
                    index
                }
                None => {
                    self.report_fault(LogicFault::new("Computer to move on a full board"));
                    return;
                }
            },
        };
        info!(index, score = result.score(), "Computer moves");
        self.play(index);
    }

    fn computer_to_move(&self) -> bool {
        self.mode == OpponentMode::Computer
            && self.state.is_active()
            && self.state.current_player() == COMPUTER_MARK
    }

    fn turn_status(&self) -> String {
        match (self.mode, self.state.current_player()) {
            (OpponentMode::Computer, HUMAN_MARK) => "Your turn!".to_string(),
            (OpponentMode::Computer, _) => "Computer's turn".to_string(),
            (OpponentMode::Human, player) if player == self.local_player => {
                "Your turn!".to_string()
            }
            (OpponentMode::Human, player) => format!("Player {}'s turn", player),
        }
    }

    fn schedule(&mut self, kind: TaskKind, delay: Duration) {
        self.scheduler.schedule(kind, delay, self.generation);
    }

    fn report_fault(&mut self, fault: LogicFault) {
        error!(%fault, "Game invariant violated");
        self.events.push(GameEvent::Fault(fault));
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.events.push(GameEvent::Updated(snapshot));
    }

    fn publish_share(&mut self) {
        match self.share_query() {
            Ok(query) => self.events.push(GameEvent::ShareUpdated(query)),
            Err(e) => warn!(error = %e, "Could not encode share link"),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn human_session() -> GameSession {
        let mut session = GameSession::default();
        session.select_opponent_mode(OpponentMode::Human);
        session.drain_events();
        session
    }

    #[test]
    fn test_new_session_against_computer() {
        let mut session = GameSession::default();
        assert_eq!(session.mode(), OpponentMode::Computer);
        assert_eq!(session.state().current_player(), Player::X);
        assert_eq!(session.status(), "Playing with Computer.");
        let events = session.drain_events();
        assert!(matches!(events.first(), Some(GameEvent::Updated(_))));
    }

    #[test]
    fn test_occupied_move_ignored() {
        let mut session = human_session();
        assert!(session.make_move(4).is_applied());
        let before = *session.state();
        assert_eq!(
            session.make_move(4),
            MoveResult::Ignored(IgnoreReason::Occupied)
        );
        assert_eq!(*session.state(), before);
        assert_eq!(session.state().current_player(), Player::O);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut session = GameSession::default();
        assert_eq!(
            session.make_move(9),
            MoveResult::Ignored(IgnoreReason::OutOfRange)
        );
    }

    #[test]
    fn test_computer_replies_after_delay() {
        let mut session = GameSession::default();
        session.make_move(4);
        assert_eq!(session.status(), "Computer's turn");
        assert_eq!(
            session.make_move(0),
            MoveResult::Ignored(IgnoreReason::ComputerTurn)
        );

        session.tick(ms(400));
        assert_eq!(session.state().board().get(0), Some(Cell::Empty));

        session.tick(ms(100));
        assert_eq!(session.state().board().get(0), Some(Cell::O));
        assert_eq!(session.state().current_player(), Player::X);
        assert_eq!(session.status(), "Your turn!");
    }

    #[test]
    fn test_win_scores_and_auto_resets() {
        let mut session = human_session();
        for index in [0, 3, 1, 4] {
            session.make_move(index);
        }
        assert_eq!(
            session.make_move(2),
            MoveResult::Applied(GameOutcome::Win(Player::X, WinLine::TopRow))
        );
        assert_eq!(session.scores().human(), 1);
        assert_eq!(session.status(), "Player X has won!");
        assert!(!session.state().is_active());
        assert_eq!(
            session.make_move(5),
            MoveResult::Ignored(IgnoreReason::Inactive)
        );

        session.tick(ms(1400));
        assert!(matches!(session.phase(), Phase::RoundOver(_)));
        session.tick(ms(100));
        assert_eq!(session.phase(), Phase::AwaitingMove);
        assert_eq!(*session.state(), GameState::new());
        assert_eq!(session.scores().human(), 1);
    }

    #[test]
    fn test_o_win_against_human_not_counted() {
        let mut session = human_session();
        for index in [0, 3, 1, 4, 8, 5] {
            session.make_move(index);
        }
        assert_eq!(session.snapshot().outcome.winner(), Some(Player::O));
        assert_eq!(session.scores(), ScoreBoard::default());
    }

    #[test]
    fn test_draw_resets_after_two_seconds() {
        let mut session = human_session();
        // X O X / X O O / O X X
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            session.make_move(index);
        }
        assert_eq!(session.phase(), Phase::RoundOver(GameOutcome::Draw));
        assert_eq!(session.status(), "Game ended in a draw!");
        session.tick(ms(1900));
        assert!(matches!(session.phase(), Phase::RoundOver(_)));
        session.tick(ms(100));
        assert_eq!(session.phase(), Phase::AwaitingMove);
    }

    #[test]
    fn test_reset_cancels_pending_computer_move() {
        let mut session = GameSession::default();
        session.make_move(4);
        let generation = session.generation();
        session.reset();
        assert_eq!(session.generation(), generation.next());
        session.tick(ms(5000));
        assert_eq!(*session.state(), GameState::new());
    }

    #[test]
    fn test_mode_switch_resets_board_and_keeps_score() {
        let mut session = human_session();
        for index in [0, 3, 1, 4, 2] {
            session.make_move(index);
        }
        session.select_opponent_mode(OpponentMode::Computer);
        assert_eq!(*session.state(), GameState::new());
        assert_eq!(session.scores().human(), 1);
        assert_eq!(session.mode(), OpponentMode::Computer);
        assert_eq!(session.next_due(), None);
    }

    #[test]
    fn test_human_mode_emits_share_links() {
        let mut session = human_session();
        session.make_move(4);
        let shared = session
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::ShareUpdated(query) => Some(query),
                _ => None,
            })
            .last();
        assert_eq!(shared, Some(session.share_query().unwrap()));
    }

    #[test]
    fn test_import_rejects_corrupt_state() {
        let mut session = GameSession::default();
        session.drain_events();
        let board = Board::from_cells([
            Cell::X,
            Cell::X,
            Cell::X,
            Cell::O,
            Cell::O,
            Cell::O,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]);
        session.import_state(GameState::from_parts(board, Player::X, true));
        assert_eq!(*session.state(), GameState::new());
        assert!(
            session
                .drain_events()
                .iter()
                .any(|event| matches!(event, GameEvent::Fault(_)))
        );
    }

    #[test]
    fn test_import_checks_turn_order_after_reactivating() {
        let mut session = GameSession::default();
        session.drain_events();
        let mut board = Board::new();
        board.place(4, Player::X).unwrap();
        board.place(0, Player::O).unwrap();

        // Open board flagged inactive, with O to move although X is due.
        session.import_state(GameState::from_parts(board, Player::O, false));
        assert!(
            session
                .drain_events()
                .iter()
                .any(|event| matches!(event, GameEvent::Fault(_)))
        );
        assert_eq!(*session.state(), GameState::new());

        session.tick(ms(5000));
        assert_eq!(session.state().board().count(Player::O), 0);
    }

    #[test]
    fn test_import_drops_pending_auto_reset() {
        let mut session = human_session();
        for index in [0, 3, 1, 4, 2] {
            session.make_move(index);
        }
        assert!(session.next_due().is_some());
        let generation = session.generation();

        let mut board = Board::new();
        board.place(8, Player::X).unwrap();
        session.import_state(GameState::from_parts(board, Player::O, true));
        assert!(session.generation() > generation);
        assert_eq!(session.next_due(), None);

        session.tick(ms(1500));
        assert_eq!(session.state().board().get(8), Some(Cell::X));
        assert_eq!(session.state().current_player(), Player::O);
        assert_eq!(session.phase(), Phase::AwaitingMove);
    }
}
