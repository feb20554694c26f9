//! Moves and the errors they can produce.
//!
//! A move carries the mark the caller claims to play, so the turn check is
//! an explicit precondition rather than something inferred from the request.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being played.
    pub player: Mark,
    /// Where it is placed.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(player: Mark, position: Position) -> Self {
        Self { player, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// Rule violations reported by the engine.
///
/// All kinds are recoverable; the engine leaves the input state untouched
/// whenever it returns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// Position number outside 1-9.
    #[display("Invalid position {}, must be between 1 and 9", _0)]
    InvalidPosition(i64),

    /// The game is already finished.
    #[display("Game is already over")]
    GameOver,

    /// The move was submitted by the mark that is not on turn.
    #[display("Not your turn: {} is to move, {} tried to play", expected, got)]
    WrongTurn {
        /// Mark on turn.
        expected: Mark,
        /// Mark that attempted the move.
        got: Mark,
    },

    /// The target square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    CellOccupied(Position),
}

impl std::error::Error for EngineError {}
