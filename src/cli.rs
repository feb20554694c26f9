//! Command-line interface for tictactoe_service.

use clap::{Parser, Subcommand};
use tictactoe_service::OpponentPolicy;

/// Tic-tac-toe game server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_service")]
#[command(about = "Tic-tac-toe game server with a REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "TICTACTOE_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to
        #[arg(long, env = "SERVER_HOST")]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long, env = "SERVER_PORT")]
        port: Option<u16>,

        /// SQLite database file (created if it doesn't exist)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Automatic opponent policy: first-empty or random
        #[arg(long, env = "OPPONENT_POLICY")]
        opponent: Option<OpponentPolicy>,

        /// Seed for the random opponent
        #[arg(long, env = "OPPONENT_SEED")]
        opponent_seed: Option<u64>,
    },

    /// Apply database migrations and exit
    Migrate {
        /// SQLite database file (created if it doesn't exist)
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}
