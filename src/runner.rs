//! Interactive terminal loop.
//!
//! Reads one command per line and sleeps on the tokio clock until the
//! session's next deferred task is due, whichever comes first.

use crate::terminal::TerminalView;
use anyhow::Result;
use sharetoe_core::{GameEvent, GameSession, MoveResult, OpponentMode, Position};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

const HELP: &str = "Commands: 0-8 or a cell name (\"top left\") to move, \
computer, invite, share, reset, help, quit";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select a cell.
    Move(usize),
    /// Play against the computer.
    Computer,
    /// Play against another person.
    Invite,
    /// Print the share link.
    Share,
    /// Start the round over.
    Reset,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
}

impl Command {
    /// Parses a line; `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_lowercase();
        match word.as_str() {
            "computer" | "vs computer" => Some(Command::Computer),
            "invite" => Some(Command::Invite),
            "share" | "link" => Some(Command::Share),
            "reset" | "restart" => Some(Command::Reset),
            "help" | "?" => Some(Command::Help),
            "quit" | "exit" | "q" => Some(Command::Quit),
            _ => Position::parse(&word).map(|pos| Command::Move(pos.to_index())),
        }
    }
}

/// Runs the game until `quit` or end of input.
///
/// At end of input, tasks still scheduled (the computer's reply, a pending
/// reset) are allowed to finish first.
#[instrument(skip_all)]
pub async fn run<R, W>(session: &mut GameSession, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let view = TerminalView::new();
    let mut lines = input.lines();
    let mut clock = Instant::now();

    output.write_all(format!("{}\n\n", HELP).as_bytes()).await?;
    flush_events(session, &view, output).await?;

    loop {
        if session.next_due() == Some(Duration::ZERO) {
            session.tick(Duration::ZERO);
            flush_events(session, &view, output).await?;
            continue;
        }

        let wait = session.next_due();
        let mut slept = Duration::ZERO;
        tokio::select! {
            biased;
            _ = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {
                slept = wait.unwrap_or_default();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if !handle_line(session, &line, output).await? {
                    info!("Player quit");
                    return Ok(());
                }
                flush_events(session, &view, output).await?;
            }
        }
        let now = Instant::now();
        session.tick((now - clock).max(slept));
        clock = now;
        flush_events(session, &view, output).await?;
    }

    while let Some(wait) = session.next_due() {
        tokio::time::sleep(wait).await;
        let now = Instant::now();
        session.tick((now - clock).max(wait));
        clock = now;
        flush_events(session, &view, output).await?;
    }
    Ok(())
}

/// Applies one input line. Returns false when the player quits.
async fn handle_line<W>(session: &mut GameSession, line: &str, output: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    if line.trim().is_empty() {
        return Ok(true);
    }
    match Command::parse(line) {
        Some(Command::Move(index)) => {
            if let MoveResult::Ignored(reason) = session.make_move(index) {
                output
                    .write_all(format!("Move ignored: {}\n", reason).as_bytes())
                    .await?;
            }
        }
        Some(Command::Computer) => session.select_opponent_mode(OpponentMode::Computer),
        Some(Command::Invite) => session.select_opponent_mode(OpponentMode::Human),
        Some(Command::Share) => {
            let query = session.share_query()?;
            output.write_all(format!("Share: ?{}\n", query).as_bytes()).await?;
        }
        Some(Command::Reset) => session.reset(),
        Some(Command::Help) => output.write_all(format!("{}\n", HELP).as_bytes()).await?,
        Some(Command::Quit) => return Ok(false),
        None => {
            output
                .write_all(format!("Unknown command: {}\n", line.trim()).as_bytes())
                .await?
        }
    }
    Ok(true)
}

/// Writes the latest snapshot plus any share links and faults.
async fn flush_events<W>(
    session: &mut GameSession,
    view: &TerminalView,
    output: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut latest = None;
    let mut notes = Vec::new();
    for event in session.drain_events() {
        match event {
            GameEvent::Updated(snapshot) => latest = Some(snapshot),
            GameEvent::ShareUpdated(query) if session.mode() == OpponentMode::Human => {
                notes.push(format!("Share: ?{}", query));
            }
            GameEvent::ShareUpdated(_) => {}
            GameEvent::Fault(fault) => notes.push(format!("Error: {}", fault)),
        }
    }
    if let Some(snapshot) = latest {
        output.write_all(view.render(&snapshot).as_bytes()).await?;
    }
    for note in notes {
        output.write_all(format!("{}\n", note).as_bytes()).await?;
    }
    output.flush().await?;
    Ok(())
}
