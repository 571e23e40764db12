//! Sharetoe - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use sharetoe::{AppConfig, TerminalView};
use sharetoe_core::{
    GameSession, LaunchOptions, Minimax, OpponentMode, Position, decode_token, evaluate,
};
use tokio::io::BufReader;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;
    initialize_tracing(&config);

    match cli.command {
        Command::Play {
            state,
            link,
            invite,
            depth,
        } => run_play(config, state, link, invite, depth).await,
        Command::Suggest { state, depth } => run_suggest(&config, &state, depth),
        Command::Share { moves } => run_share(&config, &moves),
        Command::Decode { token } => run_decode(&token),
    }
}

/// Logs go to stderr so stdout stays a clean game screen.
fn initialize_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Play interactively on stdin/stdout
#[instrument(skip(config, state, link))]
async fn run_play(
    config: AppConfig,
    state: Option<String>,
    link: Option<String>,
    invite: bool,
    depth: Option<u32>,
) -> Result<()> {
    let config = match depth {
        Some(depth) => config.with_search_depth(depth),
        None => config,
    };

    let mut options = match (&state, &link) {
        (Some(token), _) => LaunchOptions::from_query(&format!("state={}", token)),
        (None, Some(link)) => LaunchOptions::from_link(link),
        (None, None) => LaunchOptions::default(),
    };
    if invite {
        options = LaunchOptions::new(options.state().copied(), true);
    }

    let mut session = GameSession::launch(config.session().clone(), &options);
    info!(mode = %session.mode(), "Starting terminal game");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    sharetoe::run(&mut session, stdin, &mut stdout).await
}

/// Print the engine's recommendation as JSON
#[instrument(skip(config, token))]
fn run_suggest(config: &AppConfig, token: &str, depth: Option<u32>) -> Result<()> {
    let state = decode_token(token).context("Invalid share token")?;
    let engine = Minimax::new(depth.unwrap_or(*config.session().search_depth()));
    let result = engine.best_move(state.board(), state.current_player());

    let report = serde_json::json!({
        "player": state.current_player(),
        "depth": engine.depth(),
        "index": result.index(),
        "position": result.index().and_then(Position::from_index).map(|p| p.label()),
        "score": result.score(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Replay moves in two-player mode and print the resulting share query
#[instrument(skip(config))]
fn run_share(config: &AppConfig, moves: &[usize]) -> Result<()> {
    let mut session = GameSession::new(config.session().clone());
    session.select_opponent_mode(OpponentMode::Human);
    for &index in moves {
        if !session.make_move(index).is_applied() {
            bail!("Move {} cannot be played on this board", index);
        }
    }
    println!("?{}", session.share_query()?);
    Ok(())
}

/// Show a decoded share token
#[instrument(skip(token))]
fn run_decode(token: &str) -> Result<()> {
    let state = decode_token(token).context("Invalid share token")?;
    let mut session = GameSession::default();
    session.import_state(state);
    println!("{}", TerminalView::new().board(&session.snapshot()));
    println!();
    println!("Outcome: {}", evaluate(state.board()));
    if state.is_active() {
        println!("To move: {}", state.current_player());
    }
    Ok(())
}
