//! Core domain types for tic-tac-toe.

use super::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two game pieces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the opponent mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Text stored for this square: `""`, `"X"` or `"O"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Square::Empty => "",
            Square::Occupied(Mark::X) => "X",
            Square::Occupied(Mark::O) => "O",
        }
    }

    /// Parses the stored text of a square.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => Some(Square::Empty),
            "X" => Some(Square::Occupied(Mark::X)),
            "O" => Some(Square::Occupied(Mark::O)),
            _ => None,
        }
    }
}

/// Rejected board shape or cell value.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("board must be a 3x3 matrix: {}", _0)]
pub struct BoardShapeError(String);

impl std::error::Error for BoardShapeError {}

/// 3x3 tic-tac-toe board.
///
/// Serialized as three rows of three strings (`""`, `"X"`, `"O"`), the
/// shape clients and the database both see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Board {
    /// Squares in row-major order.
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from rows of squares.
    pub fn from_rows(rows: [[Square; 3]; 3]) -> Self {
        let mut squares = [Square::Empty; 9];
        for (row, cells) in rows.iter().enumerate() {
            squares[row * 3..row * 3 + 3].copy_from_slice(cells);
        }
        Self { squares }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.index()] = square;
    }

    /// Gets the square at `(row, col)`; out-of-range coordinates yield `None`.
    pub fn at(&self, row: usize, col: usize) -> Option<Square> {
        if row < 3 && col < 3 {
            Some(self.squares[row * 3 + col])
        } else {
            None
        }
    }

    /// Checks if the square at a position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Positions of empty squares in row-major order.
    #[instrument(skip(self))]
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// Returns a copy with X and O swapped on every square.
    pub fn relabeled(&self) -> Self {
        let mut squares = self.squares;
        for sq in squares.iter_mut() {
            if let Square::Occupied(mark) = *sq {
                *sq = Square::Occupied(mark.opponent());
            }
        }
        Self { squares }
    }
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board
            .squares
            .chunks(3)
            .map(|row| row.iter().map(|sq| sq.as_str().to_string()).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = BoardShapeError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        if rows.len() != 3 {
            return Err(BoardShapeError(format!("expected 3 rows, got {}", rows.len())));
        }
        let mut squares = [Square::Empty; 9];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != 3 {
                return Err(BoardShapeError(format!(
                    "row {} has {} cells",
                    r,
                    row.len()
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                squares[r * 3 + c] = Square::parse(cell).ok_or_else(|| {
                    BoardShapeError(format!("invalid cell {:?} at ({}, {})", cell, r, c))
                })?;
            }
        }
        Ok(Self { squares })
    }
}

/// Whether the game still accepts moves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Moves are accepted.
    #[default]
    Playing,
    /// Terminal; no further moves.
    Finished,
}

/// Winner of a game.
///
/// `Nobody` covers both games in progress and draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Winner {
    /// No line has been completed.
    #[default]
    Nobody,
    /// The mark that completed a line.
    Mark(Mark),
}

impl Winner {
    /// Returns the winning mark, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Winner::Nobody => None,
            Winner::Mark(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Winner {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Winner::Nobody, Winner::Mark)
    }
}

impl From<Winner> for Option<Mark> {
    fn from(winner: Winner) -> Self {
        winner.mark()
    }
}

/// Complete game state: board, turn, status and winner.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_new::new,
)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The board.
    board: Board,
    /// Mark to move next.
    current_player: Mark,
    /// Game status.
    status: GameStatus,
    /// Winner, set only when a line is completed.
    winner: Winner,
}

impl GameState {
    /// Creates the initial state: empty board, X to move, playing.
    pub fn start() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            status: GameStatus::Playing,
            winner: Winner::Nobody,
        }
    }

    /// True once no further moves are accepted.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub(super) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(super) fn set_current_player(&mut self, mark: Mark) {
        self.current_player = mark;
    }

    pub(super) fn finish(&mut self, winner: Winner) {
        self.status = GameStatus::Finished;
        self.winner = winner;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::start()
    }
}
