mod action;
mod engine;
mod opponent;
mod position;
pub mod rules;
mod types;

pub use action::{EngineError, Move};
pub use engine::{apply_move, end_game, evaluate, is_consistent, system_play};
pub use opponent::{FirstEmpty, OpponentPolicy, OpponentStrategy, RandomEmpty};
pub use position::{Position, position_to_coordinates};
pub use rules::{check_draw, check_winner};
pub use types::{Board, BoardShapeError, GameState, GameStatus, Mark, Square, Winner};
