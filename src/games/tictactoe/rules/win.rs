//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};
use tracing::instrument;

const fn p(n: u8) -> Position {
    Position::ALL[(n - 1) as usize]
}

/// Every line that wins, in scan order: row 0, column 0, row 1, column 1,
/// row 2, column 2, then the main and anti diagonals.
pub const LINES: [[Position; 3]; 8] = [
    [p(1), p(2), p(3)],
    [p(1), p(4), p(7)],
    [p(4), p(5), p(6)],
    [p(2), p(5), p(8)],
    [p(7), p(8), p(9)],
    [p(3), p(6), p(9)],
    [p(1), p(5), p(9)],
    [p(3), p(5), p(7)],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark of the first fully matching line in [`LINES`] order,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        let sq = board.get(a);
        if let Square::Occupied(mark) = sq
            && sq == board.get(b)
            && sq == board.get(c)
        {
            return Some(mark);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [&str; 3]) -> Board {
        let mut b = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let sq = match ch {
                    'X' => Square::Occupied(Mark::X),
                    'O' => Square::Occupied(Mark::O),
                    _ => Square::Empty,
                };
                b.set(Position::from_coordinates(r, c).unwrap(), sq);
            }
        }
        b
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        assert_eq!(check_winner(&board(["XXX", "OO.", "..."])), Some(Mark::X));
    }

    #[test]
    fn test_winner_column() {
        assert_eq!(check_winner(&board(["XO.", "XO.", ".O."])), Some(Mark::O));
    }

    #[test]
    fn test_winner_diagonal() {
        assert_eq!(check_winner(&board(["O..", ".O.", "..O"])), Some(Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        assert_eq!(check_winner(&board(["..X", ".X.", "X.."])), Some(Mark::X));
    }

    #[test]
    fn test_no_winner_incomplete() {
        assert_eq!(check_winner(&board(["XX.", "...", "..."])), None);
    }

    #[test]
    fn test_lower_index_line_detected_first() {
        // Not reachable in play; pins the scan order.
        assert_eq!(check_winner(&board(["XXX", "...", "OOO"])), Some(Mark::X));
        assert_eq!(check_winner(&board(["O.X", "O.X", "O.X"])), Some(Mark::O));
    }
}
