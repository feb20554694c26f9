//! Property tests for the rules and engine.

use proptest::prelude::*;
use tictactoe_service::{
    Board, EngineError, FirstEmpty, GameState, GameStatus, Mark, Move, OpponentStrategy, Position,
    RandomEmpty, Square, Winner, apply_move, check_draw, check_winner, evaluate,
    position_to_coordinates, system_play,
};

fn square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Mark::X)),
        Just(Square::Occupied(Mark::O)),
    ]
}

fn board() -> impl Strategy<Value = Board> {
    prop::array::uniform9(square()).prop_map(|squares| {
        let mut board = Board::new();
        for (pos, sq) in Position::ALL.into_iter().zip(squares) {
            board.set(pos, sq);
        }
        board
    })
}

fn mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::X), Just(Mark::O)]
}

proptest! {
    #[test]
    fn winner_symmetric_under_relabeling(b in board()) {
        prop_assert_eq!(
            check_winner(&b.relabeled()),
            check_winner(&b).map(Mark::opponent)
        );
    }

    #[test]
    fn draw_iff_full_and_no_winner(b in board()) {
        let full = b.empty_positions().is_empty();
        prop_assert_eq!(check_draw(&b), full && check_winner(&b).is_none());
    }

    #[test]
    fn invalid_positions_rejected(n in prop_oneof![i64::MIN..1i64, 10i64..i64::MAX]) {
        prop_assert_eq!(position_to_coordinates(n), Err(EngineError::InvalidPosition(n)));
    }

    #[test]
    fn finished_game_rejects_every_move(
        b in board(),
        to_move in mark(),
        player in mark(),
        n in 1i64..=9,
        won_by in prop::option::of(mark()),
    ) {
        let state = GameState::new(b, to_move, GameStatus::Finished, Winner::from(won_by));
        let result = apply_move(&state, Move::new(player, Position::new(n).unwrap()));
        prop_assert_eq!(result, Err(EngineError::GameOver));
    }

    #[test]
    fn non_current_player_always_wrong_turn(b in board(), to_move in mark(), n in 1i64..=9) {
        let state = GameState::new(b, to_move, GameStatus::Playing, Winner::Nobody);
        let result = apply_move(&state, Move::new(to_move.opponent(), Position::new(n).unwrap()));
        prop_assert_eq!(
            result,
            Err(EngineError::WrongTurn { expected: to_move, got: to_move.opponent() })
        );
    }

    #[test]
    fn random_playouts_keep_invariants(seed in any::<u64>(), human_moves in prop::collection::vec(0usize..9, 5)) {
        let mut state = GameState::start();
        let mut opponent = RandomEmpty::seeded(seed);
        let mut marks = 0;

        for pick in human_moves {
            if state.is_finished() {
                break;
            }
            let empty = state.board().empty_positions();
            let position = empty[pick % empty.len()];
            let next = apply_move(&state, Move::new(Mark::X, position)).unwrap();
            marks += 1;
            prop_assert_eq!(next.board().get(position), Square::Occupied(Mark::X));
            state = next;

            if !state.is_finished() {
                state = system_play(&state, &mut opponent).unwrap();
                marks += 1;
            }

            let (status, winner) = evaluate(&state);
            prop_assert_eq!(*state.status(), status);
            prop_assert_eq!(*state.winner(), winner);
            prop_assert_eq!(state.board().empty_positions().len(), 9 - marks);
            if !state.is_finished() {
                prop_assert_eq!(*state.current_player(), Mark::X);
            }
        }
    }

    #[test]
    fn first_empty_is_lowest_empty(b in board()) {
        let expected = b.empty_positions().first().copied();
        prop_assert_eq!(FirstEmpty.choose(&b), expected);
    }
}
