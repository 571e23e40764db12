//! Command-line interface for sharetoe.

use clap::{Parser, Subcommand};

/// Sharetoe - tic-tac-toe with shareable game links
#[derive(Parser, Debug)]
#[command(name = "sharetoe")]
#[command(about = "Tic-tac-toe against a minimax opponent or a friend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = "sharetoe.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Share token to resume from
        #[arg(long, conflicts_with = "link")]
        state: Option<String>,

        /// Full share link (or its query string) to resume from
        #[arg(long)]
        link: Option<String>,

        /// Join as the second player (O) against another person
        #[arg(long)]
        invite: bool,

        /// Override the computer's search depth
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Print the engine's move for the side to move in a shared state
    Suggest {
        /// Share token to analyse
        #[arg(long)]
        state: String,

        /// Search depth (defaults to the configured depth)
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Replay moves and print the share query for the result
    Share {
        /// Comma-separated cell indices, X first (e.g. "4,0,8")
        #[arg(long, value_delimiter = ',')]
        moves: Vec<usize>,
    },

    /// Decode a share token and show the board
    Decode {
        /// Share token
        token: String,
    },
}
