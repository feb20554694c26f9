//! Board positions numbered 1-9 in reading order.

use super::action::EngineError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the board, 1 (top-left) through 9 (bottom-right).
///
/// Positions map to `(row, col)` with `row = (n - 1) / 3` and
/// `col = (n - 1) % 3`. Only 1-9 can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Top-left (1).
    pub const TOP_LEFT: Position = Position(1);
    /// Center (5).
    pub const CENTER: Position = Position(5);
    /// Bottom-right (9).
    pub const BOTTOM_RIGHT: Position = Position(9);

    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position(1),
        Position(2),
        Position(3),
        Position(4),
        Position(5),
        Position(6),
        Position(7),
        Position(8),
        Position(9),
    ];

    /// Validates a position number.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPosition`] unless `n` is in 1-9.
    #[instrument]
    pub fn new(n: i64) -> Result<Self, EngineError> {
        if (1..=9).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(EngineError::InvalidPosition(n))
        }
    }

    /// Position at `(row, col)`, or `None` outside the 3x3 grid.
    pub fn from_coordinates(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Some(Self((row * 3 + col + 1) as u8))
        } else {
            None
        }
    }

    /// The position number, 1-9.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based row-major index, 0-8.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Zero-based `(row, col)`.
    pub fn coordinates(self) -> (usize, usize) {
        (self.index() / 3, self.index() % 3)
    }
}

impl TryFrom<i64> for Position {
    type Error = EngineError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> Self {
        pos.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts a position number to zero-based `(row, col)`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPosition`] when `n` is outside 1-9.
#[instrument]
pub fn position_to_coordinates(n: i64) -> Result<(usize, usize), EngineError> {
    Position::new(n).map(Position::coordinates)
}
