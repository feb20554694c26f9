//! Tic-tac-toe service library
//!
//! A tic-tac-toe rules engine with a REST transport and SQLite persistence.
//!
//! # Architecture
//!
//! - **Engine**: pure state transitions over [`GameState`] values
//! - **Persistence**: [`GameRepository`] stores games and players with Diesel
//! - **Players**: [`PlayerService`] maps phone numbers to stable player ids
//! - **Server**: axum router built by [`router`]
//!
//! # Example
//!
//! ```
//! use tictactoe_service::{FirstEmpty, GameState, Mark, Move, Position, apply_move, system_play};
//!
//! # fn example() -> Result<(), tictactoe_service::EngineError> {
//! let state = GameState::start();
//! let state = apply_move(&state, Move::new(Mark::X, Position::new(5)?))?;
//! let state = system_play(&state, &mut FirstEmpty)?;
//! assert_eq!(*state.current_player(), Mark::X);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod games;
mod player_service;
mod server;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Persistence
pub use db::{DbError, DbErrorKind, GameRecord, GameRepository, NewPlayer, Player};

// Crate-level exports - Player resolution
pub use player_service::{PlayerService, normalize_phone};

// Crate-level exports - HTTP transport
pub use server::{
    ApiError, AppState, EndGameResponse, GameView, MoveRequest, RegisterPlayerRequest,
    StartGameRequest, StartGameResponse, router,
};

// Crate-level exports - Game engine
pub use games::tictactoe::{
    Board, BoardShapeError, EngineError, FirstEmpty, GameState, GameStatus, Mark, Move,
    OpponentPolicy, OpponentStrategy, Position, RandomEmpty, Square, Winner, apply_move,
    check_draw, check_winner, end_game, evaluate, is_consistent, position_to_coordinates,
    system_play,
};
