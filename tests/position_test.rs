//! Tests for position numbering.

use tictactoe_service::{Board, EngineError, Mark, Position, Square, position_to_coordinates};

#[test]
fn test_coordinates_of_each_position() {
    let expected = [
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 0),
        (1, 1),
        (1, 2),
        (2, 0),
        (2, 1),
        (2, 2),
    ];
    for (n, coords) in (1..=9).zip(expected) {
        assert_eq!(position_to_coordinates(n), Ok(coords));
    }
}

#[test]
fn test_round_trip() {
    for n in 1..=9 {
        let (row, col) = position_to_coordinates(n).unwrap();
        let back = Position::from_coordinates(row, col).unwrap();
        assert_eq!(i64::from(back.number()), n);
    }
}

#[test]
fn test_out_of_range() {
    for n in [0, 10, -1, i64::MAX, i64::MIN] {
        assert_eq!(position_to_coordinates(n), Err(EngineError::InvalidPosition(n)));
    }
    assert_eq!(Position::from_coordinates(3, 0), None);
    assert_eq!(Position::from_coordinates(0, 3), None);
}

#[test]
fn test_position_json_validates() {
    let pos: Position = serde_json::from_str("4").unwrap();
    assert_eq!(pos.coordinates(), (1, 0));
    assert!(serde_json::from_str::<Position>("0").is_err());
    assert_eq!(serde_json::to_string(&Position::CENTER).unwrap(), "5");
}

#[test]
fn test_empty_positions_filters_occupied() {
    let mut board = Board::new();
    board.set(Position::TOP_LEFT, Square::Occupied(Mark::X));
    board.set(Position::CENTER, Square::Occupied(Mark::O));

    let empty = board.empty_positions();
    assert_eq!(empty.len(), 7);
    assert!(!empty.contains(&Position::TOP_LEFT));
    assert!(!empty.contains(&Position::CENTER));
    assert_eq!(empty[0].number(), 2);
}
